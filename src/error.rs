//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 命令行入口需要同时处理签名链路错误、文件读写错误与报告序列化错误，
//! 这里用 `AppError` 收拢，避免各处 `.map_err(|e| e.to_string())`。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `SignatureError` / `std::io::Error` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，便于嵌入 JSON 输出。

use serde::Serialize;

use crate::signature::SignatureError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 签名提取流水线错误（加载 / 解码 / 分类 / 编码）
    #[error("{0}")]
    Signature(#[from] SignatureError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 命令行参数错误
    #[error("参数错误: {0}")]
    Usage(String),

    /// 报告序列化失败
    #[error("序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl AppError {
    /// 稳定错误码，签名链路错误沿用其自身错误码。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Signature(err) => err.code(),
            Self::Io(_) => "io_error",
            Self::Usage(_) => "usage_error",
            Self::Serialize(_) => "serialize_error",
        }
    }
}

/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
