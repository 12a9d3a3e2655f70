//! # isosurface 子命令 CLI 定义
//!
//! 单文件或批量估计重构振幅的等值面。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/isosurface.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 直方图图像格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PlotFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
}

impl PlotFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            PlotFormat::Png => "png",
            PlotFormat::Svg => "svg",
        }
    }
}

/// isosurface 子命令参数
#[derive(Args, Debug)]
pub struct IsosurfaceArgs {
    /// Input: volume file (.npy/.npz) or directory of volumes
    pub input: PathBuf,

    /// Array name inside .npz archives (default: first array)
    #[arg(long)]
    pub key: Option<String>,

    /// Number of histogram bins
    #[arg(long, default_value_t = 100)]
    pub nbins: usize,

    /// Number of standard deviations below the amplitude peak
    #[arg(long, default_value_t = 3.0)]
    pub sigma_criterion: f64,

    /// CSV summary file (batch mode)
    #[arg(short, long, default_value = "isosurface_summary.csv")]
    pub output: PathBuf,

    /// Plot the amplitude distribution of each input
    #[arg(long, default_value_t = false)]
    pub plot: bool,

    /// Directory for the distribution plots (default: next to each input)
    #[arg(long)]
    pub plot_dir: Option<PathBuf>,

    /// Plot image format
    #[arg(long, value_enum, default_value = "png")]
    pub format: PlotFormat,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    // ─────────────────────────────────────────────────────────────
    // 批量处理参数
    // ─────────────────────────────────────────────────────────────
    /// Glob pattern for input files (batch mode, e.g., "*.npz,amp_*.npy")
    #[arg(long, default_value = "*.npy,*.npz")]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto, batch mode only)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Recurse into subdirectories (batch mode)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,
}
