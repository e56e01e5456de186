//! # 配置模块
//!
//! ## 设计思路
//!
//! 二值化算法的数值（最大边长、阈值系数与上限、边缘比例、裁剪留白）直接决定输出正确性，
//! 属于实现常量，不开放调节。
//! `SignatureConfig` 只承载输入侧的资源上限与缩放滤镜，防止异常大图拖垮单次调用。

use image::imageops::FilterType;

use super::SignatureError;

/// 归一化后最长边上限（像素）。
pub const MAX_DIMENSION: u32 = 1200;
/// 阈值相对中心平均亮度的系数。
pub const THRESHOLD_MULTIPLIER: f64 = 0.7;
/// 阈值硬上限。
pub const THRESHOLD_CAP: f64 = 130.0;
/// 边缘排除带占短边的比例。
pub const EDGE_MARGIN_FRACTION: f64 = 0.08;
/// 裁剪时包围盒四周的留白（像素）。
pub const CROP_PADDING: u32 = 15;
/// 亮度采样窗口占宽度的比例。
pub const SAMPLE_WIDTH_FRACTION: f64 = 0.8;
/// 亮度采样窗口占高度的比例。
pub const SAMPLE_HEIGHT_FRACTION: f64 = 0.4;

const MIN_FILE_SIZE_LIMIT: u64 = 1024;

/// 输入侧资源配置。
///
/// 默认值按当前手机主摄（48/50/200 MP）留足余量，普通拍照帧不会触发上限。
#[derive(Debug, Clone)]
pub struct SignatureConfig {
    /// 读取原始字节时允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 解码前允许的单边最大像素数，交给 `image::Limits` 在读取 header 后检查。
    pub max_source_dimension: u32,
    /// 解码器允许分配的内存上限（字节），对应 `image::Limits::max_alloc`。
    pub max_decoded_bytes: u64,
    /// 归一化降采样滤镜。
    pub resize_filter: FilterType,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            max_file_size: 64 * 1024 * 1024,
            max_source_dimension: 20_000,
            max_decoded_bytes: 1024 * 1024 * 1024,
            resize_filter: FilterType::Triangle,
        }
    }
}

impl SignatureConfig {
    /// 校验配置是否可用。
    pub fn validate(&self) -> Result<(), SignatureError> {
        if self.max_file_size < MIN_FILE_SIZE_LIMIT {
            return Err(SignatureError::InvalidConfig(format!(
                "max_file_size 不能小于 {} 字节",
                MIN_FILE_SIZE_LIMIT
            )));
        }
        if self.max_source_dimension == 0 {
            return Err(SignatureError::InvalidConfig(
                "max_source_dimension 必须大于 0".to_string(),
            ));
        }
        if self.max_decoded_bytes == 0 {
            return Err(SignatureError::InvalidConfig(
                "max_decoded_bytes 必须大于 0".to_string(),
            ));
        }
        Ok(())
    }

    /// 转换为解码器限制。
    pub(crate) fn decoder_limits(&self) -> image::Limits {
        let mut limits = image::Limits::default();
        limits.max_image_width = Some(self.max_source_dimension);
        limits.max_image_height = Some(self.max_source_dimension);
        limits.max_alloc = Some(self.max_decoded_bytes);
        limits
    }
}
