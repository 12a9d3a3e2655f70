//! # 分析结果数据模型
//!
//! 批量等值面估计的汇总行，可直接序列化为 CSV。
//!
//! ## 依赖关系
//! - 被 `commands/isosurface.rs` 填充
//! - 被 `io/export.rs` 写出

use crate::volume::IsosurfaceEstimate;

use serde::Serialize;

/// 单个重构文件的等值面估计结果
#[derive(Debug, Clone, Serialize)]
pub struct IsosurfaceRecord {
    /// 输入文件名
    pub file: String,

    /// 估计的等值面
    pub isosurface: f64,

    /// KDE 主峰位置
    pub peak: f64,

    /// 半高宽
    pub fwhm: f64,

    /// 估计的标准差
    pub sigma: f64,

    /// 背景阈值
    pub background: f64,

    /// 背景之上的体素数
    pub voxels: usize,
}

impl IsosurfaceRecord {
    pub fn new(file: impl Into<String>, estimate: &IsosurfaceEstimate) -> Self {
        IsosurfaceRecord {
            file: file.into(),
            isosurface: estimate.isosurface,
            peak: estimate.peak,
            fwhm: estimate.fwhm(),
            sigma: estimate.sigma,
            background: estimate.background,
            voxels: estimate.filtered_amplitude.len(),
        }
    }
}
