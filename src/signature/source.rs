//! # 数据源与中间模型
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `SignatureSource` 表示拍照组件交来的帧
//! - `RawFrame` 表示已加载但未解码的字节

use std::borrow::Cow;

/// 签名帧输入来源。
pub enum SignatureSource {
    /// Base64（支持 Data URL 与纯 Base64 字符串）。
    Base64(String),
    /// 本地文件路径来源。
    FilePath(String),
    /// 内存中的已编码图片。
    Bytes(Vec<u8>),
}

/// 加载阶段输出：原始字节与来源标识。
///
/// 调用方直接传入的切片按借用保存，不复制。
pub(crate) struct RawFrame<'a> {
    /// 原始图片字节。
    pub(crate) bytes: Cow<'a, [u8]>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}
