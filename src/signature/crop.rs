//! 裁剪：把分类后的位图裁到包围盒外扩 `CROP_PADDING` 的区域，越界部分按图像边界截断。

use image::RgbaImage;
use image::imageops::crop_imm;

use super::classify::BoundingBox;
use super::config::CROP_PADDING;

/// 裁剪区域（左上角 + 宽高）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// 根据包围盒与图像尺寸计算裁剪区域。
    ///
    /// ```text
    /// x = max(0, min_x - padding)
    /// w = min(width - x, (max_x - min_x) + 2 * padding)
    /// ```
    pub fn around(bbox: &BoundingBox, image_width: u32, image_height: u32) -> Self {
        let padding = CROP_PADDING as i64;

        let x = (bbox.min_x as i64 - padding).max(0);
        let y = (bbox.min_y as i64 - padding).max(0);
        let width = (image_width as i64 - x).min((bbox.max_x as i64 - bbox.min_x as i64) + 2 * padding);
        let height = (image_height as i64 - y).min((bbox.max_y as i64 - bbox.min_y as i64) + 2 * padding);

        Self {
            x: x as u32,
            y: y as u32,
            width: width.max(1) as u32,
            height: height.max(1) as u32,
        }
    }

    pub fn contains_box(&self, bbox: &BoundingBox) -> bool {
        bbox.min_x >= self.x
            && bbox.min_y >= self.y
            && bbox.max_x < self.x + self.width
            && bbox.max_y < self.y + self.height
    }
}

/// 从分类后的位图中取出裁剪区域。
pub fn crop(bitmap: &RgbaImage, rect: CropRect) -> RgbaImage {
    crop_imm(bitmap, rect.x, rect.y, rect.width, rect.height).to_image()
}
