//! # support 子命令 CLI 定义
//!
//! 由重构振幅计算支撑区，可选外壳与膨胀。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/support.rs`

use super::parse_shape;
use clap::Args;
use std::path::PathBuf;

/// support 子命令参数
#[derive(Args, Debug)]
pub struct SupportArgs {
    /// Input volume (.npy or .npz, real amplitude or complex object)
    pub input: PathBuf,

    /// Array name inside a .npz archive (default: first array)
    #[arg(long)]
    pub key: Option<String>,

    /// Output support file (.npy)
    #[arg(short, long, default_value = "support.npy")]
    pub output: PathBuf,

    /// Isosurface threshold in normalized amplitude (estimated if not given)
    #[arg(short, long)]
    pub isosurface: Option<f64>,

    /// Number of histogram bins for the isosurface estimation
    #[arg(long, default_value_t = 100)]
    pub nbins: usize,

    /// Number of standard deviations below the amplitude peak
    #[arg(long, default_value_t = 3.0)]
    pub sigma_criterion: f64,

    /// Set voxels outside the support to NaN instead of 0
    #[arg(long, default_value_t = false)]
    pub nan_values: bool,

    /// Replace the support by its hull
    #[arg(long, default_value_t = false)]
    pub hull: bool,

    /// Neighbour-sum threshold for the hull
    #[arg(long, default_value_t = 18.0)]
    pub hull_threshold: f64,

    /// Odd convolution kernel size for the hull
    #[arg(long, default_value_t = 3)]
    pub kernel_size: usize,

    /// Dilate the support by one voxel
    #[arg(long, default_value_t = false)]
    pub size_up: bool,

    /// Padding added to the support extent (e.g., 4,4,4)
    #[arg(long, value_parser = parse_shape)]
    pub padding: Option<[usize; 3]>,

    /// Allow a different suggested size per axis
    #[arg(long, default_value_t = false)]
    pub asymmetric: bool,
}
