//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `SignatureExtractor` 只负责流程编排，每次调用都从零创建全部中间缓冲，
//! 不持有跨调用的可变状态。处理链路固定为：
//! 1. 按来源加载原始字节
//! 2. 解码并归一化到最长边 1200
//! 3. 中心亮度采样 → 阈值 → 边缘排除带
//! 4. 分类 + 去噪 + 包围盒
//! 5. 裁剪并编码为透明 PNG
//!
//! 任一阶段失败立即终止，不返回半成品。
//! 记录 `load/decode/classify/encode/total` 阶段耗时，便于性能诊断。

use image::RgbaImage;
use std::borrow::Cow;
use std::time::Instant;

use super::classify::classify;
use super::crop::{CropRect, crop};
use super::encode::{ExtractionReport, ProcessedImage, encode_png};
use super::margin::EdgeMargin;
use super::sampler::{SamplingWindow, average_brightness, threshold_for};
use super::source::RawFrame;
use super::{SignatureConfig, SignatureError, SignatureSource};

/// 签名提取器。
pub struct SignatureExtractor {
    config: SignatureConfig,
}

impl SignatureExtractor {
    /// 根据配置创建提取器，配置不合法时直接拒绝。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use signature_extract::signature::{SignatureConfig, SignatureExtractor, SignatureSource};
    ///
    /// let extractor = SignatureExtractor::new(SignatureConfig::default())?;
    /// let processed = extractor.process_source(SignatureSource::FilePath("capture.jpg".into()))?;
    /// println!("{}x{}", processed.width, processed.height);
    /// # Ok::<(), signature_extract::signature::SignatureError>(())
    /// ```
    pub fn new(config: SignatureConfig) -> Result<Self, SignatureError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// 处理主入口：从任意来源加载签名帧并提取签名。
    pub fn process_source(&self, source: SignatureSource) -> Result<ProcessedImage, SignatureError> {
        let config = &self.config;
        let load_start = Instant::now();
        let raw = match source {
            SignatureSource::Base64(data) => self.load_from_base64(&data, config)?,
            SignatureSource::FilePath(path) => self.load_from_file(&path, config)?,
            SignatureSource::Bytes(bytes) => self.load_from_bytes(Cow::Owned(bytes), config)?,
        };
        self.process_raw(raw, load_start)
    }

    /// 处理内存中的已编码帧，直接借用调用方缓冲。
    pub fn process_frame(&self, raw_frame: &[u8]) -> Result<ProcessedImage, SignatureError> {
        let load_start = Instant::now();
        let raw = self.load_from_bytes(Cow::Borrowed(raw_frame), &self.config)?;
        self.process_raw(raw, load_start)
    }

    fn process_raw(
        &self,
        raw: RawFrame<'_>,
        load_start: Instant,
    ) -> Result<ProcessedImage, SignatureError> {
        let load_elapsed = load_start.elapsed();

        let decode_start = Instant::now();
        let (bitmap, source_dims) = self.decode_and_normalize(raw, &self.config)?;
        let decode_elapsed = decode_start.elapsed();

        let processed = self.extract(bitmap, source_dims)?;

        log::info!(
            "✅ 签名提取完成 - load={}ms decode={}ms total={}ms 输出: {}x{}",
            load_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            load_start.elapsed().as_millis(),
            processed.width,
            processed.height
        );

        Ok(processed)
    }

    /// 跳过加载与解码，直接处理已解码位图（仍会做归一化）。
    pub fn process_bitmap(&self, bitmap: RgbaImage) -> Result<ProcessedImage, SignatureError> {
        let source_dims = bitmap.dimensions();
        if source_dims.0 == 0 || source_dims.1 == 0 {
            return Err(SignatureError::Decode("图片尺寸为 0".to_string()));
        }
        let normalized = Self::normalize_frame(
            image::DynamicImage::ImageRgba8(bitmap),
            self.config.resize_filter,
        )?;
        self.extract(normalized, source_dims)
    }

    fn extract(
        &self,
        bitmap: RgbaImage,
        (source_width, source_height): (u32, u32),
    ) -> Result<ProcessedImage, SignatureError> {
        let (width, height) = bitmap.dimensions();

        let classify_start = Instant::now();
        let window = SamplingWindow::centered(width, height);
        let avg_center_brightness = average_brightness(&bitmap, window);
        let threshold = threshold_for(avg_center_brightness);
        let margin = EdgeMargin::for_dimensions(width, height);

        log::debug!(
            "🔎 采样窗口 {:?} 平均亮度={:.2} 阈值={:.2} 边缘带={}px",
            window,
            avg_center_brightness,
            threshold,
            margin.margin
        );

        let classification = match classify(&bitmap, threshold, margin) {
            Ok(classification) => classification,
            Err(err) => {
                log::info!(
                    "🚫 未检测到签名 - 尺寸: {}x{} 平均亮度={:.2} 阈值={:.2}",
                    width,
                    height,
                    avg_center_brightness,
                    threshold
                );
                return Err(err);
            }
        };
        let classify_elapsed = classify_start.elapsed();

        let encode_start = Instant::now();
        let bbox = classification.bounding_box;
        let rect = CropRect::around(&bbox, width, height);
        let cropped = crop(&classification.bitmap, rect);
        let png = encode_png(cropped)?;
        let encode_elapsed = encode_start.elapsed();

        log::debug!(
            "✂️ 包围盒 {:?} 裁剪 {:?} 墨迹像素={} classify={}ms encode={}ms",
            bbox,
            rect,
            classification.ink_pixels,
            classify_elapsed.as_millis(),
            encode_elapsed.as_millis()
        );

        Ok(ProcessedImage {
            width: rect.width,
            height: rect.height,
            png,
            report: ExtractionReport {
                source_width,
                source_height,
                normalized_width: width,
                normalized_height: height,
                sampling_window: window,
                avg_center_brightness,
                threshold,
                edge_margin: margin.margin,
                bounding_box: bbox,
                crop: rect,
                ink_pixels: classification.ink_pixels,
            },
        })
    }
}

/// 使用默认配置处理一帧已编码图片。
///
/// # 示例
/// ```rust,no_run
/// let frame = std::fs::read("capture.jpg").expect("read capture");
/// let processed = signature_extract::signature::process(&frame)?;
/// std::fs::write("signature.png", &processed.png).expect("write output");
/// # Ok::<(), signature_extract::signature::SignatureError>(())
/// ```
pub fn process(raw_frame: &[u8]) -> Result<ProcessedImage, SignatureError> {
    SignatureExtractor::new(SignatureConfig::default())?.process_frame(raw_frame)
}
