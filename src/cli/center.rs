//! # center 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/center.rs`

use super::parse_shape;
use crate::volume::CenterReference;
use clap::Args;
use std::path::PathBuf;

/// center 子命令参数
#[derive(Args, Debug)]
pub struct CenterArgs {
    /// Input volume (.npy or .npz)
    pub input: PathBuf,

    /// Array name inside a .npz archive (default: first array)
    #[arg(long)]
    pub key: Option<String>,

    /// Output file (.npy)
    #[arg(short, long, default_value = "centered.npy")]
    pub output: PathBuf,

    /// Reference to center on: 'com', 'max' or a position 'i,j,k'
    #[arg(short, long, default_value = "com")]
    pub reference: CenterReference,

    /// Repeat centering on the center of mass until it no longer moves
    #[arg(long, default_value_t = false)]
    pub iterate: bool,

    /// Crop or pad the centered volume to this shape (e.g., 128,128,128)
    #[arg(short, long, value_parser = parse_shape)]
    pub shape: Option<[usize; 3]>,

    /// Value used when padding
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub pad_value: f64,
}
