//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 统一处理不同来源（Base64 / 本地文件 / 内存字节）的原始字节加载，并在“尽可能早”的阶段执行输入校验。
//! 目标是尽快失败，减少不必要内存与 CPU 消耗。
//!
//! ## 实现思路
//!
//! - Base64：Data URL 前缀剥离 + 解码前体积预估 + 解码。
//! - 文件：存在性 + metadata 体积限制 + 读取。
//! - 内存字节：按借用接收，只做体积限制。
//! - 所有来源最终都做一次 magic bytes 校验；不是图片的输入一律视为解码失败。

use base64::{Engine as _, engine::general_purpose};
use std::borrow::Cow;
use std::path::Path;

use super::source::RawFrame;
use super::{SignatureConfig, SignatureError, SignatureExtractor};

const DATA_URL_IMAGE_PREFIX: &str = "data:image/";
const DATA_URL_BASE64_MARKER: &str = ";base64,";

impl SignatureExtractor {
    /// 从 Base64 字符串加载签名帧。
    pub(crate) fn load_from_base64(
        &self,
        data: &str,
        config: &SignatureConfig,
    ) -> Result<RawFrame<'static>, SignatureError> {
        log::debug!("📝 开始处理 base64 签名帧");

        let bytes = Self::parse_base64_with_limit(data, config.max_file_size)?;

        if bytes.len() as u64 > config.max_file_size {
            return Err(SignatureError::ResourceLimit(format!(
                "Base64 解码后体积过大：{:.2} MB（限制：{:.2} MB）",
                bytes.len() as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }
        Self::validate_image_signature(&bytes)?;

        Ok(RawFrame {
            bytes: Cow::Owned(bytes),
            source_hint: "base64",
        })
    }

    /// 从本地路径加载签名帧。
    pub(crate) fn load_from_file(
        &self,
        path: &str,
        config: &SignatureConfig,
    ) -> Result<RawFrame<'static>, SignatureError> {
        log::debug!("📁 开始读取本地签名帧 - 路径: {}", path);

        let file_path = Path::new(path);
        if !file_path.exists() {
            return Err(SignatureError::FileSystem(format!("文件不存在：{}", path)));
        }

        let metadata = std::fs::metadata(file_path)
            .map_err(|e| SignatureError::FileSystem(format!("无法读取文件信息：{}", e)))?;

        if metadata.len() > config.max_file_size {
            return Err(SignatureError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                metadata.len() as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        let bytes = std::fs::read(file_path)
            .map_err(|e| SignatureError::FileSystem(format!("无法读取图片文件：{}", e)))?;
        Self::validate_image_signature(&bytes)?;

        Ok(RawFrame {
            bytes: Cow::Owned(bytes),
            source_hint: "file",
        })
    }

    /// 接收内存中的已编码帧，借用的切片不会被复制。
    pub(crate) fn load_from_bytes<'a>(
        &self,
        bytes: Cow<'a, [u8]>,
        config: &SignatureConfig,
    ) -> Result<RawFrame<'a>, SignatureError> {
        if bytes.len() as u64 > config.max_file_size {
            return Err(SignatureError::ResourceLimit(format!(
                "图片体积过大：{:.2} MB（限制：{:.2} MB）",
                bytes.len() as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }
        Self::validate_image_signature(&bytes)?;

        Ok(RawFrame {
            bytes,
            source_hint: "bytes",
        })
    }

    /// 解析 Base64 输入（支持 Data URL / 纯 Base64）。
    pub fn parse_base64(data: &str) -> Result<Vec<u8>, SignatureError> {
        Self::parse_base64_with_limit(data, u64::MAX)
    }

    fn estimate_base64_decoded_upper_bound_len(base64_data: &str) -> Result<u64, SignatureError> {
        let len = base64_data.trim().len() as u64;
        let groups = len
            .checked_add(3)
            .ok_or_else(|| SignatureError::ResourceLimit("Base64 输入长度溢出".to_string()))?
            / 4;

        groups
            .checked_mul(3)
            .ok_or_else(|| SignatureError::ResourceLimit("Base64 解码体积估算溢出".to_string()))
    }

    fn parse_base64_with_limit(data: &str, max_file_size: u64) -> Result<Vec<u8>, SignatureError> {
        let normalized = data.trim();

        let payload = if normalized.starts_with(DATA_URL_IMAGE_PREFIX) {
            let marker = normalized
                .find(DATA_URL_BASE64_MARKER)
                .ok_or_else(|| SignatureError::Decode("Data URL 缺少 base64 标记".to_string()))?;
            &normalized[marker + DATA_URL_BASE64_MARKER.len()..]
        } else {
            normalized
        };

        let estimated_len = Self::estimate_base64_decoded_upper_bound_len(payload)?;
        if estimated_len > max_file_size {
            return Err(SignatureError::ResourceLimit(format!(
                "Base64 预计解码体积过大：{:.2} MB（限制：{:.2} MB）",
                estimated_len as f64 / 1024.0 / 1024.0,
                max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| SignatureError::Decode(format!("Base64 解码失败：{}", e)))
    }

    /// 通过文件签名（magic bytes）校验输入是否为图片。
    fn validate_image_signature(bytes: &[u8]) -> Result<(), SignatureError> {
        if bytes.is_empty() {
            return Err(SignatureError::Decode("图片内容为空".to_string()));
        }

        let kind = infer::get(bytes)
            .ok_or_else(|| SignatureError::Decode("无法识别图片类型".to_string()))?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(SignatureError::Decode(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }

        Ok(())
    }
}
