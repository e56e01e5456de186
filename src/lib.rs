//! # 签名提取工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │        拍照组件（取景框 + 引导框，外部协作方）             │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ 单帧静态图片（Data URL / 文件 / 字节）
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↓            签名提取 (Rust)                        │
//! │                                                          │
//! │  ┌─ error ────── AppError (命令行侧统一错误)              │
//! │  │                                                       │
//! │  └─ signature ── 加载·归一化·阈值·分类·裁剪·编码          │
//! │      └─ SignatureExtractor / process                     │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ 透明背景 PNG（ProcessedImage）
//! ┌───────┴──────────────────────────────────────────────────┐
//! │        上传 / 存储 / 打印（外部协作方）                   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，命令行入口的返回类型 |
//! | [`signature`] | 从拍照帧提取裁剪好的透明背景签名图 |

pub mod error;
pub mod signature;
