//! # 进度条工具
//!
//! 批量估计时显示已处理的体数据文件，单文件的 KDE 拟合使用 spinner。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs`、`commands/isosurface.rs` 使用
//! - 使用 `indicatif` crate

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

const FILE_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} volumes ({eta}) {wide_msg}";
const SPINNER_TEMPLATE: &str = "{spinner:.green} {elapsed_precise} {msg}";

/// 模板无效时退回默认样式
fn style_or(template: &str, fallback: ProgressStyle) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or(fallback)
}

/// 批量处理进度条，消息栏为最近完成的文件名
pub fn create_file_bar(files: usize) -> ProgressBar {
    let pb = ProgressBar::new(files as u64);
    pb.set_style(style_or(FILE_BAR_TEMPLATE, ProgressStyle::default_bar()).progress_chars("#>-"));
    pb
}

/// 进度条上显示的文件名（无文件名时用完整路径）
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// 创建 spinner（KDE 等耗时但无进度的计算）
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        style_or(SPINNER_TEMPLATE, ProgressStyle::default_spinner())
            .tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
