//! # 归一化与滤波
//!
//! ## 依赖关系
//! - 被 `volume/support.rs`、`volume/isosurface.rs` 使用
//! - 使用 `ndarray`、`num-complex`

use crate::error::{CdiError, Result};

use ndarray::{Array, Array3, ArrayBase, Data, Dimension};
use num_complex::Complex64;

/// 忽略 NaN 的最小值与最大值
pub fn nan_min_max<S, D>(data: &ArrayBase<S, D>) -> Option<(f64, f64)>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    data.iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// 将数据线性归一化到 [0, 1]
///
/// `zero_centered` 为真时以 `±max(|min|, |max|)` 为范围，0 映射到 0.5。
/// NaN 保持为 NaN。
pub fn normalize<S, D>(data: &ArrayBase<S, D>, zero_centered: bool) -> Result<Array<f64, D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let (min, max) =
        nan_min_max(data).ok_or_else(|| CdiError::EmptyData("nothing to normalize".into()))?;

    let (vmin, ptp) = if zero_centered {
        let abs_max = min.abs().max(max.abs());
        (-abs_max, 2.0 * abs_max)
    } else {
        (min, max - min)
    };

    if ptp == 0.0 {
        return Err(CdiError::ZeroRange(min));
    }

    Ok(data.mapv(|v| (v - vmin) / ptp))
}

/// 复数数组归一化
///
/// 先平移使实部与虚部的最小值都为 0，再除以平移后模的最大值。
pub fn normalize_complex_array(array: &Array3<Complex64>) -> Result<Array3<Complex64>> {
    if array.is_empty() {
        return Err(CdiError::EmptyData("complex array is empty".into()));
    }

    let re_min = array.iter().map(|z| z.re).fold(f64::INFINITY, f64::min);
    let im_min = array.iter().map(|z| z.im).fold(f64::INFINITY, f64::min);
    let offset = Complex64::new(re_min, im_min);

    let shifted = array.mapv(|z| z - offset);
    let max_norm = shifted.iter().map(|z| z.norm()).fold(0.0_f64, f64::max);

    if max_norm == 0.0 {
        return Err(CdiError::ZeroRange(0.0));
    }

    Ok(shifted.mapv(|z| z / max_norm))
}

/// 对数映射（X 射线工具库中 `maplog` 的约定）
///
/// 数据被截断到 `[max·10^-dynlow, max·10^-dynhigh]` 后取 `log10`。
pub fn maplog<S, D>(data: &ArrayBase<S, D>, dynlow: f64, dynhigh: f64) -> Result<Array<f64, D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let (_, max) =
        nan_min_max(data).ok_or_else(|| CdiError::EmptyData("nothing to map".into()))?;

    if max <= 0.0 {
        return Err(CdiError::InvalidArgument(format!(
            "maplog requires a positive maximum, got {}",
            max
        )));
    }

    let upper = max * 10f64.powf(-dynhigh);
    let lower = max * 10f64.powf(-dynlow);

    Ok(data.mapv(|v| v.clamp(lower, upper).log10()))
}

/// 基础滤波：`maplog(data, min_value, 0)` 的 10 次方
pub fn basic_filter<S, D>(data: &ArrayBase<S, D>, maplog_min_value: f64) -> Result<Array<f64, D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    Ok(maplog(data, maplog_min_value, 0.0)?.mapv(|v| v.powi(10)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn test_normalize_range() {
        let data = array![2.0, 4.0, 6.0];
        let n = normalize(&data, false).unwrap();
        assert_eq!(n, array![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_normalize_zero_centered() {
        let data = array![-1.0, 0.0, 4.0];
        let n = normalize(&data, true).unwrap();

        assert!((n[0] - 0.375).abs() < 1e-12);
        assert!((n[1] - 0.5).abs() < 1e-12);
        assert!((n[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_keeps_nan() {
        let data = array![f64::NAN, 1.0, 3.0];
        let n = normalize(&data, false).unwrap();
        assert!(n[0].is_nan());
        assert_eq!(n[2], 1.0);
    }

    #[test]
    fn test_normalize_constant_fails() {
        let data = Array1::from_elem(4, 7.0);
        assert!(matches!(
            normalize(&data, false),
            Err(CdiError::ZeroRange(_))
        ));
    }

    #[test]
    fn test_normalize_complex_array() {
        let mut z = Array3::<Complex64>::zeros((1, 1, 2));
        z[[0, 0, 0]] = Complex64::new(-1.0, -1.0);
        z[[0, 0, 1]] = Complex64::new(2.0, 3.0);

        let n = normalize_complex_array(&z).unwrap();

        // 平移后为 0 与 3+4i，最大模为 5
        assert!(n[[0, 0, 0]].norm() < 1e-12);
        assert!((n[[0, 0, 1]] - Complex64::new(0.6, 0.8)).norm() < 1e-12);
    }

    #[test]
    fn test_maplog_clips_dynamic_range() {
        let data = array![1e-6, 1e-2, 1.0];
        let m = maplog(&data, 3.0, 0.0).unwrap();

        assert!((m[0] + 3.0).abs() < 1e-12);
        assert!((m[1] + 2.0).abs() < 1e-12);
        assert!(m[2].abs() < 1e-12);
    }

    #[test]
    fn test_basic_filter_is_tenth_power() {
        let data = array![1e-6, 10.0, 100.0];
        let f = basic_filter(&data, 3.5).unwrap();

        // log10(100) = 2 -> 2^10
        assert!((f[2] - 1024.0).abs() < 1e-9);
        assert!((f[1] - 1.0).abs() < 1e-9);
        // 截断于 100·10^-3.5，log10 = -1.5
        assert!((f[0] - 1.5f64.powi(10)).abs() < 1e-6);
    }
}
