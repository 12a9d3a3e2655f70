//! # 绘图模块
//!
//! 基于 `plotters` 生成出版质量的图像 (PNG/SVG)。
//!
//! ## 图表
//! - 振幅分布直方图 + KDE + FWHM + 等值面标记
//! - 截面相位梯度 quiver 图
//!
//! ## 依赖关系
//! - 被 `commands/isosurface.rs`、`commands/quiver.rs` 调用
//! - 子模块: formatting, histogram, quiver

pub mod formatting;
pub mod histogram;
pub mod quiver;

pub use histogram::generate_isosurface_plot;
pub use quiver::{generate_quiver_plot, QuiverOptions};
