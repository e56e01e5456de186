//! # 透明编码模块
//!
//! 将裁剪后的位图编码为带 alpha 通道的 PNG：墨迹为不透明黑色，其余全透明。
//! 结果交给外部上传组件，`to_data_url` 提供浏览器侧常用的 Data URL 形式。

use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, ImageFormat, RgbaImage};
use serde::Serialize;
use std::io::Cursor;

use super::SignatureError;
use super::classify::BoundingBox;
use super::crop::CropRect;
use super::sampler::SamplingWindow;

/// 单次提取的诊断信息。
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    /// 解码后的原始尺寸。
    pub source_width: u32,
    pub source_height: u32,
    /// 归一化后的尺寸。
    pub normalized_width: u32,
    pub normalized_height: u32,
    pub sampling_window: SamplingWindow,
    pub avg_center_brightness: f64,
    pub threshold: f64,
    pub edge_margin: u32,
    pub bounding_box: BoundingBox,
    pub crop: CropRect,
    pub ink_pixels: usize,
}

/// 流水线最终产物。
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub width: u32,
    pub height: u32,
    /// PNG 编码字节。
    pub png: Vec<u8>,
    pub report: ExtractionReport,
}

impl ProcessedImage {
    /// 输出 `data:image/png;base64,...`。
    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(&self.png)
        )
    }
}

/// 编码为 PNG 字节。
pub fn encode_png(bitmap: RgbaImage) -> Result<Vec<u8>, SignatureError> {
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(bitmap)
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| SignatureError::Encode(format!("PNG 编码失败：{}", e)))?;
    Ok(cursor.into_inner())
}
