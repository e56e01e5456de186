//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 签名提取链路的所有失败都收敛到 `SignatureError`，每个分支都是本次调用的终态，
//! 链路内部不做任何重试。调用方（拍照界面）根据 `code()` / `stage()` 决定提示文案，
//! 例如 `no_signature_detected` 提示用户调整光线或位置后重拍。

/// 签名提取统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("解码错误：{0}")]
    Decode(String),

    #[error("配置错误：{0}")]
    InvalidConfig(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("未检测到签名，请调整光线或位置后重新拍摄")]
    NoSignatureDetected,

    #[error("编码错误：{0}")]
    Encode(String),
}

impl SignatureError {
    /// 稳定错误码，供调用方按分支展示重试提示。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode_error",
            Self::InvalidConfig(_) => "invalid_config",
            Self::FileSystem(_) => "file_system",
            Self::ResourceLimit(_) => "resource_limit",
            Self::NoSignatureDetected => "no_signature_detected",
            Self::Encode(_) => "encode_error",
        }
    }

    /// 出错所在的流水线阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "config",
            Self::FileSystem(_) => "load",
            Self::Decode(_) | Self::ResourceLimit(_) => "decode",
            Self::NoSignatureDetected => "classify",
            Self::Encode(_) => "encode",
        }
    }
}
