//! # 像素分类与去噪模块
//!
//! ## 设计思路
//!
//! 一次光栅顺序扫描同时完成三件事：阈值判定、椒盐去噪、包围盒累积。
//!
//! - 暗像素（`gray < threshold`）且位于内部矩形内，才有资格成为墨迹。
//! - 去噪只看左右两个水平邻居：至少一个邻居同样偏暗才保留，孤立暗点被丢弃。
//!   竖直方向的单像素细线因此也会被去掉，这是刻意保留的简化行为。
//! - 邻居判定读取分类前预先算好的灰度平面，不读取已经写回的输出，
//!   因此扫描顺序不会影响结果。
//!
//! ## 输出
//!
//! 墨迹像素写为不透明黑色，其余像素写为全透明白色。
//! 全透明白色的灰度为 255，再次分类时不会被误判成墨迹。

use image::{Rgba, RgbaImage};

use super::SignatureError;
use super::margin::EdgeMargin;
use super::sampler::gray_level;

pub const INK_PIXEL: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const BACKGROUND_PIXEL: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// 墨迹像素的最小外接矩形（闭区间坐标）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    fn at(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }
}

/// 逐像素的墨迹/背景判定结果，分类完成后不再修改。
#[derive(Debug, Clone)]
pub struct ClassificationMask {
    width: u32,
    height: u32,
    ink: Vec<bool>,
}

impl ClassificationMask {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        self.ink[(y as usize) * (self.width as usize) + x as usize]
    }

    /// 遍历所有墨迹像素坐标。
    pub fn ink_pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.width as usize;
        self.ink
            .iter()
            .enumerate()
            .filter(|(_, ink)| **ink)
            .map(move |(idx, _)| ((idx % width) as u32, (idx / width) as u32))
    }
}

/// 分类阶段输出。
#[derive(Debug, Clone)]
pub struct Classification {
    pub bitmap: RgbaImage,
    pub mask: ClassificationMask,
    pub bounding_box: BoundingBox,
    pub ink_pixels: usize,
}

/// 对整张位图做阈值分类与水平去噪。
///
/// 没有任何像素被判为墨迹时返回 `NoSignatureDetected`。
pub fn classify(
    bitmap: &RgbaImage,
    threshold: f64,
    margin: EdgeMargin,
) -> Result<Classification, SignatureError> {
    let (width, height) = bitmap.dimensions();
    let w = width as usize;

    let dark: Vec<bool> = bitmap
        .pixels()
        .map(|pixel| gray_level(pixel) < threshold)
        .collect();

    let mut output = RgbaImage::from_pixel(width, height, BACKGROUND_PIXEL);
    let mut ink = vec![false; dark.len()];
    let mut bounding_box: Option<BoundingBox> = None;
    let mut ink_pixels = 0usize;

    for y in 0..height {
        let row = (y as usize) * w;
        for x in 0..width {
            let idx = row + x as usize;
            if !dark[idx] || !margin.contains(x, y) {
                continue;
            }

            let left = x > 0 && dark[idx - 1];
            let right = x + 1 < width && dark[idx + 1];
            if !(left || right) {
                continue;
            }

            ink[idx] = true;
            ink_pixels += 1;
            output.put_pixel(x, y, INK_PIXEL);
            match bounding_box.as_mut() {
                Some(bbox) => bbox.include(x, y),
                None => bounding_box = Some(BoundingBox::at(x, y)),
            }
        }
    }

    let bounding_box = bounding_box.ok_or(SignatureError::NoSignatureDetected)?;

    Ok(Classification {
        bitmap: output,
        mask: ClassificationMask { width, height, ink },
        bounding_box,
        ink_pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const DARK: Rgba<u8> = Rgba([20, 20, 20, 255]);

    fn canvas(width: u32, height: u32, dark: &[(u32, u32)]) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(width, height, WHITE);
        for &(x, y) in dark {
            img.put_pixel(x, y, DARK);
        }
        img
    }

    #[test]
    fn isolated_pixels_are_removed() {
        let img = canvas(50, 50, &[(20, 20), (30, 25), (22, 30)]);
        let margin = EdgeMargin::for_dimensions(50, 50);

        let result = classify(&img, 130.0, margin);

        assert!(matches!(result, Err(SignatureError::NoSignatureDetected)));
    }

    #[test]
    fn horizontal_pair_survives_and_sets_box() {
        let img = canvas(50, 50, &[(20, 20), (21, 20)]);
        let margin = EdgeMargin::for_dimensions(50, 50);

        let result = classify(&img, 130.0, margin).expect("pair should be ink");

        assert_eq!(result.ink_pixels, 2);
        assert_eq!(
            result.bounding_box,
            BoundingBox {
                min_x: 20,
                min_y: 20,
                max_x: 21,
                max_y: 20,
            }
        );
        assert_eq!(*result.bitmap.get_pixel(20, 20), INK_PIXEL);
        assert_eq!(*result.bitmap.get_pixel(19, 20), BACKGROUND_PIXEL);
    }

    #[test]
    fn vertical_line_is_treated_as_noise() {
        let column: Vec<(u32, u32)> = (10..40).map(|y| (25, y)).collect();
        let img = canvas(50, 50, &column);
        let margin = EdgeMargin::for_dimensions(50, 50);

        let result = classify(&img, 130.0, margin);

        assert!(matches!(result, Err(SignatureError::NoSignatureDetected)));
    }

    #[test]
    fn pixels_outside_margin_are_never_ink() {
        // 50x50 的边缘带为 4 像素
        let img = canvas(50, 50, &[(1, 20), (2, 20), (3, 20), (20, 2), (21, 2)]);
        let margin = EdgeMargin::for_dimensions(50, 50);

        let result = classify(&img, 130.0, margin);

        assert!(matches!(result, Err(SignatureError::NoSignatureDetected)));
    }

    #[test]
    fn neighbor_check_reads_original_gray_across_margin() {
        // (3, 20) 在边缘带内不会成为墨迹，但仍作为 (4, 20) 的暗邻居
        let img = canvas(50, 50, &[(3, 20), (4, 20)]);
        let margin = EdgeMargin::for_dimensions(50, 50);

        let result = classify(&img, 130.0, margin).expect("interior pixel keeps its neighbor");

        assert_eq!(result.ink_pixels, 1);
        assert!(result.mask.is_ink(4, 20));
        assert!(!result.mask.is_ink(3, 20));
        assert_eq!(*result.bitmap.get_pixel(3, 20), BACKGROUND_PIXEL);
    }

    #[test]
    fn threshold_comparison_is_strict() {
        let gray = Rgba([100, 100, 100, 255]);
        let mut img = RgbaImage::from_pixel(50, 50, WHITE);
        img.put_pixel(20, 20, gray);
        img.put_pixel(21, 20, gray);
        let margin = EdgeMargin::for_dimensions(50, 50);

        assert!(classify(&img, 100.0, margin).is_err());
        assert!(classify(&img, 100.5, margin).is_ok());
    }

    #[test]
    fn reclassifying_output_keeps_strokes() {
        let stroke: Vec<(u32, u32)> = (15..35)
            .flat_map(|x| (20..24).map(move |y| (x, y)))
            .collect();
        let img = canvas(50, 50, &stroke);
        let margin = EdgeMargin::for_dimensions(50, 50);

        let first = classify(&img, 130.0, margin).expect("stroke should be ink");
        let second = classify(&first.bitmap, 130.0, margin).expect("stroke should stay ink");

        assert_eq!(first.bounding_box, second.bounding_box);
        assert_eq!(first.ink_pixels, second.ink_pixels);
        assert!(first.mask.ink_pixels().eq(second.mask.ink_pixels()));
    }

    #[test]
    fn reclassifying_can_drop_pixel_that_leaned_on_margin_neighbor() {
        // 第一次：(4, 20) 依靠边缘带内的暗邻居成为墨迹
        // 第二次：邻居已变为透明白色，(4, 20) 变成孤立点
        let img = canvas(50, 50, &[(3, 20), (4, 20), (20, 30), (21, 30)]);
        let margin = EdgeMargin::for_dimensions(50, 50);

        let first = classify(&img, 130.0, margin).expect("first pass finds ink");
        assert!(first.mask.is_ink(4, 20));

        let second = classify(&first.bitmap, 130.0, margin).expect("pair still present");
        assert!(!second.mask.is_ink(4, 20));
        assert!(second.mask.is_ink(20, 30));
        assert_eq!(second.bounding_box.min_x, 20);
    }

    proptest! {
        #[test]
        fn bounding_box_contains_and_touches_all_ink(
            dark in proptest::collection::vec((0u32..40, 0u32..30), 0..200)
        ) {
            let img = canvas(40, 30, &dark);
            let margin = EdgeMargin::for_dimensions(40, 30);

            match classify(&img, 130.0, margin) {
                Ok(result) => {
                    let bbox = result.bounding_box;
                    let ink: Vec<(u32, u32)> = result.mask.ink_pixels().collect();

                    prop_assert_eq!(ink.len(), result.ink_pixels);
                    prop_assert!(ink.iter().all(|&(x, y)| bbox.contains(x, y)));
                    prop_assert!(ink.iter().all(|&(x, y)| margin.contains(x, y)));
                    prop_assert!(ink.iter().any(|&(x, _)| x == bbox.min_x));
                    prop_assert!(ink.iter().any(|&(x, _)| x == bbox.max_x));
                    prop_assert!(ink.iter().any(|&(_, y)| y == bbox.min_y));
                    prop_assert!(ink.iter().any(|&(_, y)| y == bbox.max_y));
                }
                Err(err) => {
                    prop_assert!(matches!(err, SignatureError::NoSignatureDetected));
                }
            }
        }
    }
}
