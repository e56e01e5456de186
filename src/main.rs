//! # 签名提取工具 — 命令行入口
//!
//! 本文件仅负责日志初始化、参数解析与结果落盘。
//! 提取逻辑见 `signature` 模块。
//!
//! ```text
//! signature-extract <input> [output.png]
//! ```
//!
//! `input` 为文件路径；以 `data:image/` 开头时按 Data URL 处理。

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use signature_extract::error::AppError;
use signature_extract::signature::{SignatureConfig, SignatureExtractor, SignatureSource};

const USAGE: &str = "用法: signature-extract <输入图片路径或 Data URL> [输出 PNG 路径]";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("签名提取失败: {err}");
            eprintln!("[{}] {}", err.code(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), AppError> {
    let mut args = args.into_iter();
    let input = args.next().ok_or_else(|| AppError::Usage(USAGE.to_string()))?;
    let output = args.next().map(PathBuf::from).unwrap_or_else(default_output_path);
    if args.next().is_some() {
        return Err(AppError::Usage(USAGE.to_string()));
    }

    let source = if input.trim_start().starts_with("data:image/") {
        SignatureSource::Base64(input)
    } else {
        SignatureSource::FilePath(input)
    };

    let extractor = SignatureExtractor::new(SignatureConfig::default())?;
    let processed = extractor.process_source(source)?;

    std::fs::write(&output, &processed.png)?;
    log::info!("💾 签名已保存: {}", output.display());

    println!("{}", serde_json::to_string_pretty(&processed.report)?);
    Ok(())
}

fn default_output_path() -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d%H%M%S%f");
    PathBuf::from(format!("signature_{}.png", timestamp))
}
