//! # 图表格式
//!
//! 所有图表共享的背景、颜色与输出格式。
//!
//! ## 依赖关系
//! - 被 `plot/histogram.rs`、`plot/quiver.rs` 使用
//! - 使用 `plotters`，色图来自 `colorous`

use crate::error::CdiError;

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::path::Path;

/// 绘图区背景色
pub const BACKGROUND: RGBColor = RGBColor(234, 234, 242);
/// 直方图柱色 (dodgerblue)
pub const DODGER_BLUE: RGBColor = RGBColor(30, 144, 255);
/// KDE 曲线色 (navy)
pub const NAVY: RGBColor = RGBColor(0, 0, 128);
/// 等值面标记色 (lightcoral)
pub const LIGHT_CORAL: RGBColor = RGBColor(240, 128, 128);

/// 图像输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureFormat {
    Png,
    Svg,
}

impl FigureFormat {
    /// 从文件扩展名推断输出格式，默认 PNG
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("svg") => FigureFormat::Svg,
            _ => FigureFormat::Png,
        }
    }
}

/// plotters 错误转换
pub fn plot_err<E: std::fmt::Debug>(e: E) -> CdiError {
    CdiError::PlotError(format!("{:?}", e))
}

/// 绘制浅灰背景与白色网格
pub fn plot_background<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    x_desc: &str,
    y_desc: &str,
) -> crate::error::Result<()>
where
    DB::ErrorType: 'static,
{
    chart.plotting_area().fill(&BACKGROUND).map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .bold_line_style(WHITE.stroke_width(2))
        .light_line_style(WHITE.mix(0.6))
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(plot_err)?;

    Ok(())
}

/// viridis 色图，`t` 截断到 [0, 1]
pub fn colormap(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let (r, g, b) = colorous::VIRIDIS.eval_continuous(t).as_tuple();
    RGBColor(r, g, b)
}
