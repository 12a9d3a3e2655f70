//! # 支撑区与外壳提取
//!
//! 支撑区 (support) 是重构物体所在的体素集合；外壳 (hull) 为支撑区表面一层体素，
//! 通过全 1 核卷积得到每个体素的配位数后按阈值筛选。
//!
//! ## 依赖关系
//! - 被 `commands/support.rs`、`volume/gradient.rs` 使用
//! - 使用 `volume/normalize.rs`

use crate::error::{CdiError, Result};
use crate::volume::normalize::normalize;
use crate::volume::{box_convolve, Shape3};

use ndarray::Array3;

/// 外壳提取参数
#[derive(Debug, Clone, Copy)]
pub struct HullOptions {
    /// 配位数阈值，`0 < c <= threshold` 的体素属于外壳
    pub threshold: f64,
    /// 卷积核边长（奇数）
    pub kernel_size: usize,
    /// 外壳体素输出 1 而不是配位数
    pub boolean_values: bool,
    /// 外壳外体素输出 NaN 而不是 0
    pub nan_value: bool,
}

impl Default for HullOptions {
    fn default() -> Self {
        Self {
            threshold: 18.0,
            kernel_size: 3,
            boolean_values: false,
            nan_value: false,
        }
    }
}

/// 支撑区向外膨胀一层
pub fn size_up_support(support: &Array3<f64>) -> Array3<f64> {
    box_convolve(support, 3).mapv(|c| if c > 3.0 { 1.0 } else { 0.0 })
}

/// 提取三维物体的外壳
///
/// 阈值 >= `kernel_size³` 时返回结果与输入物体本身相近。
pub fn find_hull(volume: &Array3<f64>, options: &HullOptions) -> Result<Array3<f64>> {
    if options.kernel_size == 0 || options.kernel_size % 2 == 0 {
        return Err(CdiError::InvalidArgument(format!(
            "kernel size must be a positive odd number, got {}",
            options.kernel_size
        )));
    }

    let outside = if options.nan_value { f64::NAN } else { 0.0 };
    let coordination = box_convolve(volume, options.kernel_size);

    Ok(coordination.mapv(|c| {
        if c > 0.0 && c <= options.threshold {
            if options.boolean_values {
                1.0
            } else {
                c
            }
        } else {
            outside
        }
    }))
}

/// 以归一化后的等值面阈值生成支撑区
pub fn make_support(data: &Array3<f64>, isosurface: f64, nan_values: bool) -> Result<Array3<f64>> {
    let outside = if nan_values { f64::NAN } else { 0.0 };
    let normalized = normalize(data, false)?;
    Ok(normalized.mapv(|v| if v >= isosurface { 1.0 } else { outside }))
}

/// 将 0 转为 NaN；`boolean_values` 为真时其余值置 1
pub fn zero_to_nan(data: &Array3<f64>, boolean_values: bool) -> Array3<f64> {
    data.mapv(|v| {
        if v == 0.0 {
            f64::NAN
        } else if boolean_values {
            1.0
        } else {
            v
        }
    })
}

/// 将 NaN 转为 0；`boolean_values` 为真时其余值置 1
pub fn nan_to_zero(data: &Array3<f64>, boolean_values: bool) -> Array3<f64> {
    data.mapv(|v| {
        if v.is_nan() {
            0.0
        } else if boolean_values {
            1.0
        } else {
            v
        }
    })
}

/// 非 NaN 值置 1，NaN 置 0（或保留 NaN）
pub fn to_bool(data: &Array3<f64>, nan_value: bool) -> Array3<f64> {
    let outside = if nan_value { f64::NAN } else { 0.0 };
    data.mapv(|v| if v.is_nan() { outside } else { 1.0 })
}

/// 根据支撑区外壳的范围推荐更合适的数组形状
///
/// 每个轴取外壳索引跨度加上 `padding`；`symmetrical_shape` 为真时三个轴都取最大值。
pub fn find_suitable_array_shape(
    support: &Array3<f64>,
    padding: Option<Shape3>,
    symmetrical_shape: bool,
) -> Result<Shape3> {
    let padding = padding.unwrap_or([4, 4, 4]);
    let hull = find_hull(
        support,
        &HullOptions {
            boolean_values: true,
            ..HullOptions::default()
        },
    )?;

    let mut lower = [usize::MAX; 3];
    let mut upper = [0usize; 3];
    let mut found = false;

    for ((i, j, k), &v) in hull.indexed_iter() {
        if v != 1.0 {
            continue;
        }
        found = true;
        for (axis, idx) in [i, j, k].into_iter().enumerate() {
            lower[axis] = lower[axis].min(idx);
            upper[axis] = upper[axis].max(idx);
        }
    }

    if !found {
        return Err(CdiError::EmptyData("support has no hull voxel".into()));
    }

    let ranges = [
        upper[0] - lower[0] + padding[0],
        upper[1] - lower[1] + padding[1],
        upper[2] - lower[2] + padding[2],
    ];

    if symmetrical_shape {
        let max = ranges.into_iter().max().unwrap_or(0);
        return Ok([max; 3]);
    }

    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::s;

    fn cube(size: usize, lo: usize, hi: usize) -> Array3<f64> {
        let mut data = Array3::<f64>::zeros((size, size, size));
        data.slice_mut(s![lo..hi, lo..hi, lo..hi]).fill(1.0);
        data
    }

    #[test]
    fn test_size_up_support_grows_cube() {
        let support = cube(9, 3, 6);
        let grown = size_up_support(&support);

        assert!(grown.sum() > support.sum());
        // 原支撑区内部保持为 1
        assert_eq!(grown[[4, 4, 4]], 1.0);
        // 面上相邻体素的邻居数为 9 > 3
        assert_eq!(grown[[2, 4, 4]], 1.0);
        // 角外对角体素只有 1 个邻居
        assert_eq!(grown[[2, 2, 2]], 0.0);
    }

    #[test]
    fn test_find_hull_excludes_core() {
        let support = cube(9, 2, 7);
        let hull = find_hull(
            &support,
            &HullOptions {
                boolean_values: true,
                ..HullOptions::default()
            },
        )
        .unwrap();

        // 中心体素配位数为 27 > 18
        assert_eq!(hull[[4, 4, 4]], 0.0);
        // 立方体面中心配位数为 18
        assert_eq!(hull[[2, 4, 4]], 1.0);
        // 立方体外面贴邻的体素配位数为 9
        assert_eq!(hull[[1, 4, 4]], 1.0);
    }

    #[test]
    fn test_find_hull_high_threshold_covers_volume() {
        let support = cube(7, 2, 5);
        let hull = find_hull(
            &support,
            &HullOptions {
                threshold: 27.0,
                boolean_values: true,
                ..HullOptions::default()
            },
        )
        .unwrap();

        for ((i, j, k), &v) in support.indexed_iter() {
            if v == 1.0 {
                assert_eq!(hull[[i, j, k]], 1.0);
            }
        }
    }

    #[test]
    fn test_find_hull_nan_outside() {
        let support = cube(7, 2, 5);
        let hull = find_hull(
            &support,
            &HullOptions {
                nan_value: true,
                ..HullOptions::default()
            },
        )
        .unwrap();
        assert!(hull[[0, 0, 0]].is_nan());
        assert!(hull[[3, 3, 3]].is_nan());
    }

    #[test]
    fn test_find_hull_rejects_even_kernel() {
        let support = cube(5, 1, 4);
        let result = find_hull(
            &support,
            &HullOptions {
                kernel_size: 4,
                ..HullOptions::default()
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_make_support_threshold() {
        let mut data = Array3::<f64>::zeros((2, 2, 2));
        data[[0, 0, 0]] = 10.0;
        data[[1, 1, 1]] = 4.0;

        let support = make_support(&data, 0.5, false).unwrap();
        assert_eq!(support.sum(), 1.0);
        assert_eq!(support[[0, 0, 0]], 1.0);

        let nan_support = make_support(&data, 0.3, true).unwrap();
        assert_eq!(nan_support[[1, 1, 1]], 1.0);
        assert!(nan_support[[0, 1, 0]].is_nan());
    }

    #[test]
    fn test_nan_conversions() {
        let mut data = Array3::<f64>::zeros((1, 1, 3));
        data[[0, 0, 1]] = 2.5;

        let with_nan = zero_to_nan(&data, false);
        assert!(with_nan[[0, 0, 0]].is_nan());
        assert_eq!(with_nan[[0, 0, 1]], 2.5);

        let back = nan_to_zero(&with_nan, true);
        assert_eq!(back[[0, 0, 0]], 0.0);
        assert_eq!(back[[0, 0, 1]], 1.0);

        let flags = to_bool(&with_nan, false);
        assert_eq!(flags[[0, 0, 0]], 0.0);
        assert_eq!(flags[[0, 0, 1]], 1.0);
    }

    #[test]
    fn test_find_suitable_array_shape() {
        let mut support = Array3::<f64>::zeros((20, 20, 20));
        support.slice_mut(s![5..10, 5..15, 8..12]).fill(1.0);

        let shape = find_suitable_array_shape(&support, None, false).unwrap();
        // 外壳比物体各方向多出一层：跨度 = 长度 + 1
        assert_eq!(shape, [6 + 4, 11 + 4, 5 + 4]);

        let sym = find_suitable_array_shape(&support, Some([0, 0, 0]), true).unwrap();
        assert_eq!(sym, [11, 11, 11]);
    }

    #[test]
    fn test_find_suitable_array_shape_empty() {
        let support = Array3::<f64>::zeros((4, 4, 4));
        assert!(find_suitable_array_shape(&support, None, true).is_err());
    }
}
