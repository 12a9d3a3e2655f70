//! # angles 子命令 CLI 定义
//!
//! 探测器几何可由环境变量提供：
//! - `CDIUTILS_DETECTOR_DISTANCE`
//! - `CDIUTILS_PIXEL_SIZE`
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/angles.rs`

use super::parse_pair;
use crate::detector::DEFAULT_PIXEL_SIZE;
use clap::Args;

/// angles 子命令参数
#[derive(Args, Debug)]
pub struct AnglesArgs {
    /// In-plane detector angle recorded at the direct beam (degrees)
    #[arg(long, allow_negative_numbers = true)]
    pub inplane: f64,

    /// Out-of-plane detector angle recorded at the direct beam (degrees)
    #[arg(long, allow_negative_numbers = true)]
    pub outofplane: f64,

    /// Pixel position of the point of interest on the detector (row,column)
    #[arg(long, value_parser = parse_pair)]
    pub detector: [f64; 2],

    /// Direct beam position on the detector (pixels)
    #[arg(long, value_parser = parse_pair)]
    pub direct_beam: [f64; 2],

    /// Sample to detector distance (m)
    #[arg(long, env = "CDIUTILS_DETECTOR_DISTANCE")]
    pub distance: f64,

    /// Detector pixel size (m)
    #[arg(long, env = "CDIUTILS_PIXEL_SIZE", default_value_t = DEFAULT_PIXEL_SIZE)]
    pub pixel_size: f64,
}
