//! # 振幅分布直方图
//!
//! 绘制重构振幅分布、KDE 拟合、半高宽区间与估计的等值面。
//!
//! ## 依赖关系
//! - 被 `commands/isosurface.rs` 调用
//! - 使用 `volume/isosurface.rs` 的 IsosurfaceEstimate
//! - 使用 `plotters` 渲染图表

use crate::error::Result;
use crate::plot::formatting::{
    plot_background, plot_err, FigureFormat, DODGER_BLUE, LIGHT_CORAL, NAVY,
};
use crate::volume::IsosurfaceEstimate;

use plotters::prelude::*;
use std::path::Path;

/// 生成振幅分布图（PNG 或 SVG）
pub fn generate_isosurface_plot(
    estimate: &IsosurfaceEstimate,
    output_path: &Path,
    width: u32,
    height: u32,
) -> Result<()> {
    match FigureFormat::from_path(output_path) {
        FigureFormat::Svg => {
            let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
            draw_distribution(&root, estimate)?;
            root.present().map_err(plot_err)?;
        }
        FigureFormat::Png => {
            let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
            draw_distribution(&root, estimate)?;
            root.present().map_err(plot_err)?;
        }
    }
    Ok(())
}

/// 绘制分布图的核心逻辑
fn draw_distribution<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    estimate: &IsosurfaceEstimate,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let y_max = estimate
        .density
        .iter()
        .chain(estimate.kde_y.iter())
        .copied()
        .fold(0.0_f64, f64::max)
        * 1.1;
    let y_max = if y_max > 0.0 { y_max } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(
            "Reconstructed amplitude distribution",
            ("sans-serif", 28).into_font(),
        )
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, 0.0..y_max)
        .map_err(plot_err)?;

    plot_background(&mut chart, "normalized amplitude", "counts")?;

    // 半高宽区间
    let (left, right) = estimate.fwhm_bounds;
    let fwhm_style = GREEN.mix(0.2).filled();
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(left, 0.0), (right, y_max)],
            fwhm_style,
        )))
        .map_err(plot_err)?
        .label("FWHM")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], fwhm_style));

    // 密度直方图
    let half = estimate.bin_size / 2.0;
    let bar_style = DODGER_BLUE.mix(0.9).filled();
    chart
        .draw_series(
            estimate
                .bin_centres
                .iter()
                .zip(estimate.density.iter())
                .map(|(&c, &d)| Rectangle::new([(c - half, 0.0), (c + half, d)], bar_style)),
        )
        .map_err(plot_err)?
        .label("amplitude distribution")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], bar_style));

    // KDE 曲线与填充
    chart
        .draw_series(AreaSeries::new(
            estimate
                .kde_x
                .iter()
                .copied()
                .zip(estimate.kde_y.iter().copied()),
            0.0,
            NAVY.mix(0.3),
        ))
        .map_err(plot_err)?;
    chart
        .draw_series(LineSeries::new(
            estimate
                .kde_x
                .iter()
                .copied()
                .zip(estimate.kde_y.iter().copied()),
            NAVY.stroke_width(2),
        ))
        .map_err(plot_err)?
        .label("density estimate")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 15, y)], NAVY.stroke_width(2)));

    // 等值面标记
    let iso = estimate.isosurface;
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(iso, 0.0), (iso, estimate.kde_at_isosurface())],
            LIGHT_CORAL.stroke_width(5),
        )))
        .map_err(plot_err)?
        .label(format!("isosurface estimated at {:.3}", iso))
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 15, y)], LIGHT_CORAL.stroke_width(5))
        });

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 14))
        .draw()
        .map_err(plot_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::find_isosurface;
    use ndarray::{s, Array3};
    use tempfile::tempdir;

    #[test]
    fn test_generate_svg_plot() {
        let mut amplitude = Array3::<f64>::zeros((20, 20, 20));
        amplitude
            .slice_mut(s![5..15, 5..15, 5..15])
            .indexed_iter_mut()
            .for_each(|((i, j, k), v)| *v = 0.6 + 0.01 * ((i * 7 + j * 3 + k) % 21) as f64);
        amplitude[[0, 0, 0]] = 1.0;

        let estimate = find_isosurface(&amplitude, 50, 3.0).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("distribution.svg");
        generate_isosurface_plot(&estimate, &path, 800, 500).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<svg"));
        assert!(content.contains("isosurface estimated at"));
    }
}
