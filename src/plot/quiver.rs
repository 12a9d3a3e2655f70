//! # 截面 quiver 图
//!
//! 背景为截面标量场的热图，叠加相位梯度箭头，右侧为颜色条。
//!
//! ## 依赖关系
//! - 被 `commands/quiver.rs` 调用
//! - 使用 `volume/gradient.rs` 的 CrossSection
//! - 使用 `plotters` 渲染图表

use crate::error::{CdiError, Result};
use crate::plot::formatting::{colormap, plot_background, plot_err, FigureFormat};
use crate::volume::gradient::CrossSection;

use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// 箭头头部与箭身的夹角（弧度）
const HEAD_ANGLE: f64 = 25.0 * std::f64::consts::PI / 180.0;
/// 箭头头部长度占箭身的比例
const HEAD_RATIO: f64 = 0.3;
/// 颜色条宽度（像素）
const COLORBAR_WIDTH: i32 = 140;

/// quiver 图参数
#[derive(Debug, Clone)]
pub struct QuiverOptions {
    /// 箭头采样步长（像素）
    pub step: usize,
    /// 图标题
    pub title: String,
    /// 颜色条标签
    pub background_label: String,
    pub width: u32,
    pub height: u32,
}

impl Default for QuiverOptions {
    fn default() -> Self {
        Self {
            step: 2,
            title: String::new(),
            background_label: "amplitude".to_string(),
            width: 900,
            height: 800,
        }
    }
}

/// 生成 quiver 图（PNG 或 SVG）
pub fn generate_quiver_plot(
    section: &CrossSection,
    options: &QuiverOptions,
    output_path: &Path,
) -> Result<()> {
    if options.step == 0 {
        return Err(CdiError::InvalidArgument(
            "quiver step must be at least 1".to_string(),
        ));
    }

    match FigureFormat::from_path(output_path) {
        FigureFormat::Svg => {
            let root =
                SVGBackend::new(output_path, (options.width, options.height)).into_drawing_area();
            draw_quiver(&root, section, options)?;
            root.present().map_err(plot_err)?;
        }
        FigureFormat::Png => {
            let root = BitMapBackend::new(output_path, (options.width, options.height))
                .into_drawing_area();
            draw_quiver(&root, section, options)?;
            root.present().map_err(plot_err)?;
        }
    }
    Ok(())
}

/// 箭头线段：箭身与两条头部短线
///
/// 向量长度为 0 或非有限值时返回 `None`。
pub fn arrow_segments(tail: (f64, f64), vector: (f64, f64)) -> Option<[[(f64, f64); 2]; 3]> {
    let (dx, dy) = vector;
    let length = dx.hypot(dy);
    if !length.is_finite() || length == 0.0 {
        return None;
    }

    let head = (tail.0 + dx, tail.1 + dy);
    let (bx, by) = (-dx / length, -dy / length);
    let head_len = HEAD_RATIO * length;

    let barb = |angle: f64| {
        let (s, c) = angle.sin_cos();
        (
            head.0 + head_len * (bx * c - by * s),
            head.1 + head_len * (bx * s + by * c),
        )
    };

    Some([
        [tail, head],
        [head, barb(HEAD_ANGLE)],
        [head, barb(-HEAD_ANGLE)],
    ])
}

/// 背景的有限值范围
fn finite_range(section: &CrossSection) -> Option<(f64, f64)> {
    section
        .background
        .iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn draw_quiver<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    section: &CrossSection,
    options: &QuiverOptions,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let (rows, cols) = section.dim();
    let (vmin, vmax) = finite_range(section).unwrap_or((0.0, 1.0));
    let span = if vmax > vmin { vmax - vmin } else { 1.0 };

    let (width, _) = root.dim_in_pixel();
    let (main_area, bar_area) = root.split_horizontally(width as i32 - COLORBAR_WIDTH);

    let title = if options.title.is_empty() {
        format!("axis {} slice {}", section.axis, section.index)
    } else {
        options.title.clone()
    };

    let mut chart = ChartBuilder::on(&main_area)
        .caption(title, ("sans-serif", 26).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..cols as f64, 0.0..rows as f64)
        .map_err(plot_err)?;

    plot_background(&mut chart, "pixel", "pixel")?;

    // 行 0 位于图像顶部
    let flip = |r: f64| rows as f64 - r;

    chart
        .draw_series(section.background.indexed_iter().filter_map(|((r, c), &v)| {
            if !v.is_finite() {
                return None;
            }
            let color = colormap((v - vmin) / span);
            Some(Rectangle::new(
                [
                    (c as f64, flip(r as f64 + 1.0)),
                    (c as f64 + 1.0, flip(r as f64)),
                ],
                color.filled(),
            ))
        }))
        .map_err(plot_err)?;

    let max_magnitude = section.max_magnitude();
    if max_magnitude > 0.0 {
        let scale = 0.9 * options.step as f64 / max_magnitude;
        let mut arrows = Vec::new();
        for r in (0..rows).step_by(options.step) {
            for c in (0..cols).step_by(options.step) {
                let (u, v) = (section.u[[r, c]], section.v[[r, c]]);
                let tail = (c as f64 + 0.5, flip(r as f64 + 0.5));
                // 行方向向下为正
                if let Some(segments) = arrow_segments(tail, (u * scale, -v * scale)) {
                    arrows.extend(segments);
                }
            }
        }
        log::debug!("drawing {} arrow segments", arrows.len());

        chart
            .draw_series(
                arrows
                    .into_iter()
                    .map(|[a, b]| PathElement::new(vec![a, b], BLACK.stroke_width(1))),
            )
            .map_err(plot_err)?;
    }

    draw_colorbar(&bar_area, vmin, vmax, &options.background_label)
}

fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    vmin: f64,
    vmax: f64,
    label: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let vmax = if vmax > vmin { vmax } else { vmin + 1.0 };

    let mut bar = ChartBuilder::on(area)
        .margin_top(60)
        .margin_bottom(60)
        .margin_right(10)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..1.0, vmin..vmax)
        .map_err(plot_err)?;

    bar.configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .disable_x_axis()
        .y_desc(label)
        .y_label_style(("sans-serif", 14))
        .draw()
        .map_err(plot_err)?;

    let steps = 100;
    let dv = (vmax - vmin) / steps as f64;
    bar.draw_series((0..steps).map(|i| {
        let lo = vmin + i as f64 * dv;
        Rectangle::new(
            [(0.0, lo), (1.0, lo + dv)],
            colormap(i as f64 / (steps - 1) as f64).filled(),
        )
    }))
    .map_err(plot_err)?;

    Ok(())
}
