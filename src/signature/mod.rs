//! # 签名提取模块（signature）
//!
//! ## 设计思路
//!
//! 把“拍照帧 → 透明背景签名图”的链路按阶段拆分，每个子模块只负责一个阶段：
//!
//! - `loader`：Base64 / 文件 / 内存字节加载与安全校验
//! - `normalize`：解码、像素限制、最长边归一化
//! - `sampler`：中心窗口亮度采样与阈值计算
//! - `margin`：边缘排除带
//! - `classify`：阈值分类 + 水平去噪 + 包围盒累积
//! - `crop`：包围盒外扩裁剪
//! - `encode`：透明 PNG 编码与诊断报告
//! - `extractor`：统一编排 + 阶段耗时日志
//!
//! ## 调用链
//!
//! ```text
//! 拍照组件交来的帧
//!    ↓
//! extractor.rs（统一编排）
//!    ├─ loader.rs（来源加载 + magic bytes 校验）
//!    ├─ normalize.rs（解码 + 像素限制 + 降采样）
//!    ├─ sampler.rs / margin.rs（阈值与边缘带）
//!    ├─ classify.rs（墨迹判定 + 包围盒）
//!    ├─ crop.rs（裁剪）
//!    └─ encode.rs（透明 PNG）
//!    ↓
//! ProcessedImage 或 SignatureError
//! ```
//!
//! 链路是纯同步的单次调用，所有缓冲在调用结束时释放，没有全局状态。

pub mod classify;
mod config;
pub mod crop;
mod encode;
mod error;
mod extractor;
mod loader;
pub mod margin;
mod normalize;
pub mod sampler;
mod source;

pub use classify::{BoundingBox, Classification, ClassificationMask, classify};
pub use config::{
    CROP_PADDING, EDGE_MARGIN_FRACTION, MAX_DIMENSION, SAMPLE_HEIGHT_FRACTION,
    SAMPLE_WIDTH_FRACTION, SignatureConfig, THRESHOLD_CAP, THRESHOLD_MULTIPLIER,
};
pub use crop::CropRect;
pub use encode::{ExtractionReport, ProcessedImage};
pub use error::SignatureError;
pub use extractor::{SignatureExtractor, process};
pub use margin::EdgeMargin;
pub use normalize::normalized_dimensions;
pub use sampler::{SamplingWindow, average_brightness, threshold_for};
pub use source::SignatureSource;
