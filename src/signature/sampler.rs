//! # 中心亮度采样与阈值计算
//!
//! ## 设计思路
//!
//! 拍照界面的引导框要求用户把签名放在画面中央，因此只在中心窗口内统计平均亮度，
//! 避免画面外围的桌面、阴影等背景颜色拉偏阈值。
//!
//! 阈值 = `min(平均亮度 × 0.7, 130)`：系数随环境光线自适应，上限防止强光下整张纸被判为墨迹。

use image::RgbaImage;

use super::config::{
    SAMPLE_HEIGHT_FRACTION, SAMPLE_WIDTH_FRACTION, THRESHOLD_CAP, THRESHOLD_MULTIPLIER,
};

/// 位于位图中心的亮度采样窗口。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SamplingWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SamplingWindow {
    /// 计算居中窗口：宽 80%、高 40%。
    ///
    /// 任一边退化为 0 时回退为整张位图。
    pub fn centered(image_width: u32, image_height: u32) -> Self {
        let width = (image_width as f64 * SAMPLE_WIDTH_FRACTION).floor() as u32;
        let height = (image_height as f64 * SAMPLE_HEIGHT_FRACTION).floor() as u32;

        if width == 0 || height == 0 {
            return Self {
                x: 0,
                y: 0,
                width: image_width,
                height: image_height,
            };
        }

        Self {
            x: (image_width - width) / 2,
            y: (image_height - height) / 2,
            width,
            height,
        }
    }

    fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// 单像素灰度：`(R + G + B) / 3`。
#[inline]
pub fn gray_level(pixel: &image::Rgba<u8>) -> f64 {
    let [r, g, b, _] = pixel.0;
    (r as f64 + g as f64 + b as f64) / 3.0
}

/// 窗口内灰度均值，范围 `[0, 255]`。空窗口返回 0。
pub fn average_brightness(bitmap: &RgbaImage, window: SamplingWindow) -> f64 {
    let count = window.pixel_count();
    if count == 0 {
        return 0.0;
    }

    let mut sum = 0.0_f64;
    for y in window.y..window.y + window.height {
        for x in window.x..window.x + window.width {
            sum += gray_level(bitmap.get_pixel(x, y));
        }
    }

    sum / count as f64
}

/// 由中心平均亮度推导二值化阈值。
pub fn threshold_for(avg_center_brightness: f64) -> f64 {
    (avg_center_brightness * THRESHOLD_MULTIPLIER).min(THRESHOLD_CAP)
}
