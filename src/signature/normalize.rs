//! # 解码与归一化模块
//!
//! ## 设计思路
//!
//! 将“字节 → 图像 → RGBA”的过程集中管理。资源上限交给 `image::Limits`：
//! 解码器读完 header 就会按宽高和分配上限拒绝异常大图，不必先完整解码。
//!
//! ## 实现思路
//!
//! 1. 猜测格式并挂上 `SignatureConfig::decoder_limits()`
//! 2. 解码（超限映射为 `ResourceLimit`，其他失败映射为 `Decode`）
//! 3. 按 `MAX_DIMENSION` 等比缩小（只缩不放）
//! 4. 转换为 RGBA 位图

use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageBuffer, ImageError, ImageReader, Rgba, RgbaImage};
use std::io::Cursor;

use super::config::MAX_DIMENSION;
use super::source::RawFrame;
use super::{SignatureConfig, SignatureError, SignatureExtractor};

/// 计算归一化后的目标尺寸。
///
/// `scale = min(1, MAX_DIMENSION / max(w, h))`，目标边长向下取整且不小于 1。
pub fn normalized_dimensions(width: u32, height: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= MAX_DIMENSION {
        return (width, height);
    }

    let scale = MAX_DIMENSION as f64 / longest as f64;
    let target_width = ((width as f64 * scale).floor() as u32).max(1);
    let target_height = ((height as f64 * scale).floor() as u32).max(1);
    (target_width, target_height)
}

impl SignatureExtractor {
    /// 将原始帧解码为归一化后的 RGBA 位图。
    ///
    /// 返回值第二项为解码后的原始尺寸，用于诊断报告。
    pub(crate) fn decode_and_normalize(
        &self,
        raw: RawFrame<'_>,
        config: &SignatureConfig,
    ) -> Result<(RgbaImage, (u32, u32)), SignatureError> {
        let mut reader = ImageReader::new(Cursor::new(&raw.bytes[..]))
            .with_guessed_format()
            .map_err(|e| SignatureError::Decode(format!("无法识别图片格式：{}", e)))?;
        reader.limits(config.decoder_limits());

        let decoded = reader.decode().map_err(|e| match e {
            ImageError::Limits(limit) => {
                SignatureError::ResourceLimit(format!("图片超出解码限制：{}", limit))
            }
            other => SignatureError::Decode(format!("图片解码失败：{}", other)),
        })?;

        let (raw_width, raw_height) = decoded.dimensions();
        if raw_width == 0 || raw_height == 0 {
            return Err(SignatureError::Decode("图片尺寸为 0".to_string()));
        }

        let bitmap = Self::normalize_frame(decoded, config.resize_filter)?;

        log::debug!(
            "✅ 签名帧解码成功 - 来源: {} 原始尺寸: {}x{} 归一化尺寸: {}x{}",
            raw.source_hint,
            raw_width,
            raw_height,
            bitmap.width(),
            bitmap.height()
        );

        Ok((bitmap, (raw_width, raw_height)))
    }

    /// 按最长边上限等比缩小，已满足上限的帧原样转为 RGBA。
    pub(crate) fn normalize_frame(
        image: DynamicImage,
        filter: FilterType,
    ) -> Result<RgbaImage, SignatureError> {
        let (width, height) = image.dimensions();
        let (target_width, target_height) = normalized_dimensions(width, height);

        if (target_width, target_height) == (width, height) {
            return Ok(image.to_rgba8());
        }

        log::debug!(
            "🧩 归一化降采样：{}x{} -> {}x{}（filter={:?}）",
            width,
            height,
            target_width,
            target_height,
            filter
        );

        match Self::resize_with_fast_image_resize(&image, target_width, target_height, filter) {
            Ok(resized) => Ok(resized),
            Err(err) => {
                log::warn!(
                    "⚠️ fast_image_resize 降采样失败，回退 image::resize_exact：{}",
                    err
                );
                Ok(image
                    .resize_exact(target_width, target_height, filter)
                    .to_rgba8())
            }
        }
    }

    fn resize_with_fast_image_resize(
        image: &DynamicImage,
        target_width: u32,
        target_height: u32,
        filter: FilterType,
    ) -> Result<RgbaImage, SignatureError> {
        let src = image.to_rgba8();
        let (src_width, src_height) = src.dimensions();

        let src_image = fr::images::Image::from_vec_u8(
            src_width,
            src_height,
            src.into_raw(),
            fr::PixelType::U8x4,
        )
        .map_err(|e| SignatureError::Decode(format!("构建源图像缓冲失败：{}", e)))?;

        let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

        let mut resizer = fr::Resizer::new();
        let options = fr::ResizeOptions::new()
            .resize_alg(fr::ResizeAlg::Convolution(Self::to_fast_filter(filter)));

        resizer
            .resize(&src_image, &mut dst_image, Some(&options))
            .map_err(|e| SignatureError::Decode(format!("fast_image_resize 执行失败：{}", e)))?;

        ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(target_width, target_height, dst_image.into_vec())
            .ok_or_else(|| SignatureError::Decode("fast_image_resize 输出缓冲长度异常".to_string()))
    }

    fn to_fast_filter(filter: FilterType) -> fr::FilterType {
        match filter {
            FilterType::Nearest => fr::FilterType::Box,
            FilterType::Triangle => fr::FilterType::Bilinear,
            FilterType::CatmullRom => fr::FilterType::CatmullRom,
            FilterType::Gaussian => fr::FilterType::Mitchell,
            FilterType::Lanczos3 => fr::FilterType::Lanczos3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;

    fn create_png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            let v = ((x + y) % 255) as u8;
            Rgba([v, v, v, 255])
        });

        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .expect("failed to encode test image");
        cursor.into_inner()
    }

    fn raw(bytes: Vec<u8>) -> RawFrame<'static> {
        RawFrame {
            bytes: bytes.into(),
            source_hint: "test",
        }
    }

    #[test]
    fn normalized_dimensions_preserve_aspect_ratio() {
        assert_eq!(normalized_dimensions(2400, 1600), (1200, 800));
        assert_eq!(normalized_dimensions(1000, 3000), (400, 1200));
        assert_eq!(normalized_dimensions(1201, 1), (1200, 1));
    }

    #[test]
    fn normalized_dimensions_never_upscale() {
        assert_eq!(normalized_dimensions(640, 480), (640, 480));
        assert_eq!(normalized_dimensions(1200, 1200), (1200, 1200));
    }

    #[test]
    fn decode_downscales_large_frame() {
        let extractor = SignatureExtractor::new(SignatureConfig::default()).expect("extractor init failed");
        let config = SignatureConfig::default();

        let (bitmap, original) = extractor
            .decode_and_normalize(raw(create_png_bytes(2400, 1600)), &config)
            .expect("decode should succeed");

        assert_eq!(original, (2400, 1600));
        assert_eq!(bitmap.dimensions(), (1200, 800));
    }

    #[test]
    fn decode_keeps_small_frame_untouched() {
        let extractor = SignatureExtractor::new(SignatureConfig::default()).expect("extractor init failed");
        let config = SignatureConfig::default();

        let (bitmap, _) = extractor
            .decode_and_normalize(raw(create_png_bytes(320, 200)), &config)
            .expect("decode should succeed");

        assert_eq!(bitmap.dimensions(), (320, 200));
        assert_eq!(bitmap.get_pixel(10, 20).0, [30, 30, 30, 255]);
    }

    #[test]
    fn decode_rejects_truncated_png() {
        let extractor = SignatureExtractor::new(SignatureConfig::default()).expect("extractor init failed");
        let config = SignatureConfig::default();
        let mut bytes = create_png_bytes(64, 64);
        bytes.truncate(40);

        let result = extractor.decode_and_normalize(raw(bytes), &config);

        assert!(matches!(result, Err(SignatureError::Decode(_))));
    }

    #[test]
    fn decode_rejects_frame_wider_than_dimension_limit() {
        let mut config = SignatureConfig::default();
        config.max_source_dimension = 100;
        let extractor = SignatureExtractor::new(config.clone()).expect("extractor init failed");

        let result = extractor.decode_and_normalize(raw(create_png_bytes(200, 80)), &config);

        assert!(matches!(result, Err(SignatureError::ResourceLimit(_))));
    }

    #[test]
    fn decode_rejects_frame_over_allocation_limit() {
        let mut config = SignatureConfig::default();
        // 200x200 RGBA 需要 160_000 字节
        config.max_decoded_bytes = 64 * 1024;
        let extractor = SignatureExtractor::new(config.clone()).expect("extractor init failed");

        let result = extractor.decode_and_normalize(raw(create_png_bytes(200, 200)), &config);

        assert!(matches!(result, Err(SignatureError::ResourceLimit(_))));
    }

    #[test]
    fn decode_accepts_frame_above_forty_megapixels() {
        // 8200x5000 = 41 MP，灰度 PNG 压缩后很小
        let img = image::GrayImage::from_pixel(8200, 5000, image::Luma([255]));
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .expect("failed to encode test image");
        let extractor = SignatureExtractor::new(SignatureConfig::default()).expect("extractor init failed");
        let config = SignatureConfig::default();

        let (bitmap, original) = extractor
            .decode_and_normalize(raw(cursor.into_inner()), &config)
            .expect("high resolution capture should decode");

        assert_eq!(original, (8200, 5000));
        assert_eq!(bitmap.dimensions(), (1200, 731));
    }
}
