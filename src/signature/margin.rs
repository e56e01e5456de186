//! 边缘排除带：照片边缘的阴影、暗角和引导框边线不参与墨迹判定。

use super::config::EDGE_MARGIN_FRACTION;

/// 边缘排除带及其围出的内部矩形 `[margin, w - margin) × [margin, h - margin)`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeMargin {
    pub margin: u32,
    width: u32,
    height: u32,
}

impl EdgeMargin {
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        let margin = (EDGE_MARGIN_FRACTION * width.min(height) as f64).floor() as u32;
        Self {
            margin,
            width,
            height,
        }
    }

    /// 像素是否位于内部矩形中。
    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.margin
            && y >= self.margin
            && x < self.width.saturating_sub(self.margin)
            && y < self.height.saturating_sub(self.margin)
    }
}
