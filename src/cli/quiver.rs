//! # quiver 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/quiver.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 截面背景
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum QuiverBackground {
    /// Normalized amplitude
    #[default]
    Amplitude,
    /// Phase (radians)
    Phase,
}

impl std::fmt::Display for QuiverBackground {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuiverBackground::Amplitude => write!(f, "amplitude"),
            QuiverBackground::Phase => write!(f, "phase"),
        }
    }
}

/// quiver 子命令参数
#[derive(Args, Debug)]
pub struct QuiverArgs {
    /// Reconstructed complex object (.npy or .npz)
    pub input: PathBuf,

    /// Array name inside a .npz archive (default: first array)
    #[arg(long)]
    pub key: Option<String>,

    /// Support file; estimated from the amplitude if not given
    #[arg(long)]
    pub support: Option<PathBuf>,

    /// Array name inside the support .npz archive
    #[arg(long)]
    pub support_key: Option<String>,

    /// Isosurface used to estimate the support (estimated if not given)
    #[arg(short, long)]
    pub isosurface: Option<f64>,

    /// Axis normal to the cross section (0, 1 or 2)
    #[arg(short, long, default_value_t = 0)]
    pub axis: usize,

    /// Slice index along the axis (default: support center)
    #[arg(long)]
    pub index: Option<usize>,

    /// Arrow sampling step in pixels
    #[arg(long, default_value_t = 2)]
    pub step: usize,

    /// Scalar field drawn under the arrows
    #[arg(short, long, value_enum, default_value = "amplitude")]
    pub background: QuiverBackground,

    /// Output image (.png or .svg)
    #[arg(short, long, default_value = "cross_section_quiver.png")]
    pub output: PathBuf,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 900)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Title for the plot (default: axis and slice index)
    #[arg(long)]
    pub title: Option<String>,
}
