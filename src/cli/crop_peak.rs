//! # crop-peak 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/crop_peak.rs`

use super::parse_shape;
use clap::Args;
use std::path::PathBuf;

/// crop-peak 子命令参数
#[derive(Args, Debug)]
pub struct CropPeakArgs {
    /// Input diffraction intensity (.npy or .npz)
    pub input: PathBuf,

    /// Array name inside a .npz archive (default: first array)
    #[arg(long)]
    pub key: Option<String>,

    /// Output file (.npy)
    #[arg(short, long, default_value = "cropped_peak.npy")]
    pub output: PathBuf,

    /// Semicolon-separated centering methods: 'max', 'com' or 'i,j,k'
    #[arg(short, long, default_value = "max;com")]
    pub methods: String,

    /// Output shape around the peak (e.g., 200,200,200)
    #[arg(short, long, value_parser = parse_shape)]
    pub shape: [usize; 3],
}
