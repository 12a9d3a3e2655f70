//! # 等值面阈值估计
//!
//! 从重构振幅的分布估计合适的等值面阈值。
//!
//! ## 算法概述
//! 1. 振幅归一化并展平
//! 2. 直方图去除背景（最高计数的 bin 之后再跳过 `nbins / 20` 个 bin）
//! 3. 对剩余振幅做 Gaussian KDE（Scott 带宽）
//! 4. 由 KDE 主峰右侧的半高位置得到 FWHM，镜像得到左侧
//! 5. `isosurface = x_peak - sigma_criterion · sigma`
//!
//! ## 依赖关系
//! - 被 `commands/isosurface.rs`、`commands/support.rs` 调用
//! - 结果被 `plot/histogram.rs` 绘制
//! - 使用 `rayon` 并行计算 KDE

use crate::error::{CdiError, Result};
use crate::volume::normalize::normalize;

use ndarray::Array3;
use rayon::prelude::*;
use std::f64::consts::PI;

/// KDE 采样点数
const KDE_POINTS: usize = 1000;

/// 等值面估计结果，包含绘图所需的中间量
#[derive(Debug, Clone)]
pub struct IsosurfaceEstimate {
    /// 估计的等值面（归一化振幅）
    pub isosurface: f64,
    /// KDE 主峰位置
    pub peak: f64,
    /// 背景阈值
    pub background: f64,
    /// 去除背景后的振幅
    pub filtered_amplitude: Vec<f64>,
    /// 密度直方图的 bin 中心
    pub bin_centres: Vec<f64>,
    /// 密度直方图的值
    pub density: Vec<f64>,
    /// bin 宽度
    pub bin_size: f64,
    /// KDE 采样点 [0, 1]
    pub kde_x: Vec<f64>,
    /// KDE 值
    pub kde_y: Vec<f64>,
    /// 半高宽左右边界
    pub fwhm_bounds: (f64, f64),
    /// 估计的标准差
    pub sigma: f64,
}

impl IsosurfaceEstimate {
    /// 半高宽
    pub fn fwhm(&self) -> f64 {
        self.fwhm_bounds.1 - self.fwhm_bounds.0
    }

    /// 等值面处的 KDE 值（用于绘制标记线）
    pub fn kde_at_isosurface(&self) -> f64 {
        self.kde_x
            .iter()
            .zip(self.kde_y.iter())
            .min_by(|a, b| {
                (a.0 - self.isosurface)
                    .abs()
                    .total_cmp(&(b.0 - self.isosurface).abs())
            })
            .map(|(_, y)| *y)
            .unwrap_or(0.0)
    }
}

/// 从振幅分布估计等值面
pub fn find_isosurface(
    amplitude: &Array3<f64>,
    nbins: usize,
    sigma_criterion: f64,
) -> Result<IsosurfaceEstimate> {
    if nbins < 2 {
        return Err(CdiError::InvalidArgument(format!(
            "nbins must be at least 2, got {}",
            nbins
        )));
    }

    let flattened: Vec<f64> = normalize(amplitude, false)?
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .collect();

    // 去除背景
    let (counts, edges) = histogram(&flattened, nbins, false);
    let max_bin = argmax(&counts).unwrap_or(0);
    let background_index = (max_bin + 1 + nbins / 20).min(nbins);
    let background = edges[background_index];

    let filtered: Vec<f64> = flattened
        .iter()
        .copied()
        .filter(|&v| v > background)
        .collect();

    log::debug!(
        "background at {:.4}: kept {} of {} voxels",
        background,
        filtered.len(),
        flattened.len()
    );

    if filtered.len() < 2 {
        return Err(CdiError::EmptyData(format!(
            "only {} voxel(s) above the background level {:.4}",
            filtered.len(),
            background
        )));
    }

    // 去除背景后的密度直方图
    let (density, edges) = histogram(&filtered, nbins, true);
    let bin_centres: Vec<f64> = edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect();
    let bin_size = bin_centres[1] - bin_centres[0];

    // KDE 拟合
    let kde_x = linspace(0.0, 1.0, KDE_POINTS);
    let kde_y = gaussian_kde(&filtered, &kde_x)?;

    let max_index = argmax(&kde_y).unwrap_or(0);
    let half_max = kde_y[max_index] / 2.0;

    // 只在主峰右侧寻找半高位置
    let right_hm_index = kde_x
        .iter()
        .zip(kde_y.iter())
        .map(|(&x, &y)| if x >= kde_x[max_index] { y } else { 0.0 })
        .map(|y| (y - half_max).abs())
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
        .unwrap_or(max_index);
    let left_hm_index = (2 * max_index).saturating_sub(right_hm_index);

    let fwhm_bounds = (kde_x[left_hm_index], kde_x[right_hm_index]);
    let fwhm = fwhm_bounds.1 - fwhm_bounds.0;
    let sigma = fwhm / 2.0 * (2.0 * 2.0_f64.ln()).sqrt();
    let isosurface = kde_x[max_index] - sigma_criterion * sigma;

    log::debug!(
        "KDE peak at {:.4}, FWHM = {:.4}, sigma = {:.4}",
        kde_x[max_index],
        fwhm,
        sigma
    );

    Ok(IsosurfaceEstimate {
        isosurface,
        peak: kde_x[max_index],
        background,
        filtered_amplitude: filtered,
        bin_centres,
        density,
        bin_size,
        kde_x,
        kde_y,
        fwhm_bounds,
        sigma,
    })
}

/// 等间距直方图（numpy 约定：最后一个 bin 为闭区间）
///
/// 返回 `(counts, edges)`；`density` 为真时计数归一化为概率密度。
pub fn histogram(values: &[f64], nbins: usize, density: bool) -> (Vec<f64>, Vec<f64>) {
    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if values.is_empty() {
        lo = 0.0;
        hi = 1.0;
    } else if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let edges = linspace(lo, hi, nbins + 1);
    let width = (hi - lo) / nbins as f64;
    let mut counts = vec![0.0; nbins];

    for &v in values {
        let idx = (((v - lo) / width) as usize).min(nbins - 1);
        counts[idx] += 1.0;
    }

    if density && !values.is_empty() {
        let norm = values.len() as f64 * width;
        for c in counts.iter_mut() {
            *c /= norm;
        }
    }

    (counts, edges)
}

/// 一维 Gaussian KDE，带宽采用 Scott 规则（与 scipy 默认一致）
pub fn gaussian_kde(samples: &[f64], points: &[f64]) -> Result<Vec<f64>> {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);

    if variance.is_nan() || variance <= 0.0 {
        return Err(CdiError::InvalidArgument(
            "cannot estimate a density from values with zero variance".into(),
        ));
    }

    let factor = n.powf(-1.0 / 5.0);
    let bandwidth = variance.sqrt() * factor;
    let norm = 1.0 / (n * bandwidth * (2.0 * PI).sqrt());

    Ok(points
        .par_iter()
        .map(|&x| {
            samples
                .iter()
                .map(|&s| {
                    let z = (x - s) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm
        })
        .collect())
}

/// 等间距采样（包含端点）
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + i as f64 * step).collect()
        }
    }
}

fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 背景为 0、物体振幅围绕 `centre` 呈三角分布的体数据
    fn synthetic_amplitude(centre: f64) -> Array3<f64> {
        let mut data = Array3::<f64>::zeros((30, 30, 30));
        let mut n = 0usize;
        for i in 5..25 {
            for j in 5..25 {
                for k in 5..25 {
                    // 确定性的伪随机扰动
                    let t = ((i * 31 + j * 17 + k * 7 + n) % 101) as f64 / 100.0;
                    let u = ((i * 13 + j * 29 + k * 3) % 97) as f64 / 96.0;
                    data[[i, j, k]] = centre + 0.1 * (t + u - 1.0);
                    n += 1;
                }
            }
        }
        // 给定一个 1.0 的最大值以固定归一化
        data[[0, 0, 0]] = 1.0;
        data
    }

    #[test]
    fn test_histogram_numpy_convention() {
        let (counts, edges) = histogram(&[0.0, 0.25, 0.5, 1.0], 2, false);
        assert_eq!(edges, vec![0.0, 0.5, 1.0]);
        // 0.5 属于第二个 bin，1.0 包含在最后一个 bin 中
        assert_eq!(counts, vec![2.0, 2.0]);
    }

    #[test]
    fn test_histogram_density_integrates_to_one() {
        let values: Vec<f64> = (0..100).map(|i| i as f64 / 99.0).collect();
        let (density, edges) = histogram(&values, 10, true);
        let width = edges[1] - edges[0];
        let total: f64 = density.iter().map(|d| d * width).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_gaussian_kde_normalized() {
        let samples = vec![0.4, 0.5, 0.5, 0.6];
        let xs = linspace(-1.0, 2.0, 3001);
        let ys = gaussian_kde(&samples, &xs).unwrap();
        let dx = xs[1] - xs[0];
        let integral: f64 = ys.iter().sum::<f64>() * dx;
        assert!((integral - 1.0).abs() < 1e-3);

        assert!(gaussian_kde(&[0.3, 0.3], &xs).is_err());
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_find_isosurface_below_peak() {
        let amplitude = synthetic_amplitude(0.7);
        let estimate = find_isosurface(&amplitude, 100, 3.0).unwrap();

        let peak = estimate.peak;
        assert!((peak - 0.7).abs() < 0.05, "peak at {}", peak);
        assert!(estimate.isosurface < peak);
        assert!(estimate.isosurface > 0.0);
        assert!(estimate.fwhm() > 0.0);
        assert_eq!(estimate.bin_centres.len(), 100);
        assert_eq!(estimate.kde_x.len(), KDE_POINTS);
    }

    #[test]
    fn test_find_isosurface_sigma_criterion_monotonic() {
        let amplitude = synthetic_amplitude(0.6);
        let loose = find_isosurface(&amplitude, 100, 1.0).unwrap();
        let strict = find_isosurface(&amplitude, 100, 3.0).unwrap();
        assert!(strict.isosurface < loose.isosurface);
    }

    #[test]
    fn test_find_isosurface_formulas() {
        let amplitude = synthetic_amplitude(0.65);
        let nbins = 60;
        let k = 2.5;
        let estimate = find_isosurface(&amplitude, nbins, k).unwrap();

        // 背景取最高计数 bin 之后再跳过 nbins / 20 个 bin 的边界
        let flattened: Vec<f64> = normalize(&amplitude, false).unwrap().into_iter().collect();
        let (counts, edges) = histogram(&flattened, nbins, false);
        let max_bin = argmax(&counts).unwrap();
        assert_eq!(max_bin, 0);
        assert_eq!(estimate.background, edges[max_bin + 1 + nbins / 20]);

        // 左半高位置为右半高位置关于峰的镜像
        let index_of = |x: f64| estimate.kde_x.iter().position(|&v| v == x).unwrap();
        let peak = index_of(estimate.peak);
        let right = index_of(estimate.fwhm_bounds.1);
        let left = index_of(estimate.fwhm_bounds.0);
        assert!(right > peak);
        assert_eq!(left, 2 * peak - right);

        let expected_sigma = estimate.fwhm() / 2.0 * (2.0 * 2.0_f64.ln()).sqrt();
        assert_eq!(estimate.sigma, expected_sigma);
        assert_eq!(estimate.isosurface, estimate.peak - k * estimate.sigma);
    }

    #[test]
    fn test_find_isosurface_all_background_fails() {
        let mut amplitude = Array3::<f64>::zeros((5, 5, 5));
        amplitude[[2, 2, 2]] = 1.0;
        assert!(find_isosurface(&amplitude, 100, 3.0).is_err());
    }
}
