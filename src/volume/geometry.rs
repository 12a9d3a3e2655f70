//! # 几何工具
//!
//! 向量运算、两向量间的旋转矩阵，以及体数据中的极值位置与质心。
//!
//! ## 依赖关系
//! - 被 `volume/reshape.rs`、`volume/centering.rs`、`commands/` 使用
//! - 无外部模块依赖（除 `ndarray`）

use crate::error::{CdiError, Result};
use crate::volume::{rint, Shape3};

use ndarray::Array3;

/// 三维向量
pub type Vec3 = [f64; 3];

/// 3x3 矩阵（行优先）
pub type Matrix3 = [[f64; 3]; 3];

/// 向量点积
pub fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// 向量叉积
pub fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// 向量模长
pub fn norm(v: &Vec3) -> f64 {
    dot(v, v).sqrt()
}

/// 单位向量
pub fn unit_vector(v: &Vec3) -> Result<Vec3> {
    let n = norm(v);
    if n == 0.0 {
        return Err(CdiError::InvalidArgument(
            "cannot normalize a zero vector".into(),
        ));
    }
    Ok([v[0] / n, v[1] / n, v[2] / n])
}

/// 两向量夹角（弧度）
pub fn angle(v1: &Vec3, v2: &Vec3) -> Result<f64> {
    let denominator = norm(v1) * norm(v2);
    if denominator == 0.0 {
        return Err(CdiError::InvalidArgument(
            "angle with a zero vector is undefined".into(),
        ));
    }
    Ok((dot(v1, v2) / denominator).clamp(-1.0, 1.0).acos())
}

/// 绕 `v1 × v2` 轴将 `v1` 方向旋转到 `v2` 方向的旋转矩阵（Rodrigues 公式）
///
/// 两向量同向时返回单位矩阵；反向时旋转轴不唯一，返回错误。
pub fn v1_to_v2_rotation_matrix(v1: &Vec3, v2: &Vec3) -> Result<Matrix3> {
    let theta = angle(v1, v2)?;
    let axis = cross(v1, v2);

    if norm(&axis) < 1e-12 * norm(v1) * norm(v2) {
        if theta < std::f64::consts::FRAC_PI_2 {
            return Ok(identity());
        }
        return Err(CdiError::InvalidArgument(
            "rotation axis is undefined for anti-parallel vectors".into(),
        ));
    }

    let [n1, n2, n3] = unit_vector(&axis)?;
    let ct = theta.cos();
    let st = theta.sin();
    let vt = 1.0 - ct;

    Ok([
        [
            ct + n1 * n1 * vt,
            n1 * n2 * vt - n3 * st,
            n1 * n3 * vt + n2 * st,
        ],
        [
            n1 * n2 * vt + n3 * st,
            ct + n2 * n2 * vt,
            n2 * n3 * vt - n1 * st,
        ],
        [
            n1 * n3 * vt - n2 * st,
            n2 * n3 * vt + n1 * st,
            ct + n3 * n3 * vt,
        ],
    ])
}

fn identity() -> Matrix3 {
    [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
}

/// 最大值所在索引（C 顺序中的第一个；忽略 NaN）
pub fn find_max_pos(data: &Array3<f64>) -> Result<Shape3> {
    data.indexed_iter()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<((usize, usize, usize), f64)>, (idx, &v)| {
            match best {
                Some((_, b)) if b >= v => best,
                _ => Some((idx, v)),
            }
        })
        .map(|((i, j, k), _)| [i, j, k])
        .ok_or_else(|| CdiError::EmptyData("no finite value to locate a maximum".into()))
}

/// 以强度为权重的质心（索引坐标）
///
/// 含 NaN 的数据请使用 [`nan_center_of_mass`]。
pub fn center_of_mass(data: &Array3<f64>) -> Result<Vec3> {
    weighted_mean_index(data.indexed_iter().map(|(idx, &v)| (idx, v)))
}

/// 忽略 NaN 体素的质心
pub fn nan_center_of_mass(data: &Array3<f64>) -> Result<Vec3> {
    weighted_mean_index(
        data.indexed_iter()
            .filter(|(_, v)| !v.is_nan())
            .map(|(idx, &v)| (idx, v)),
    )
}

/// 质心取整（四舍六入五成双），并限制在数组范围内
pub fn round_position(position: &Vec3, shape: Shape3) -> Shape3 {
    let mut out = [0usize; 3];
    for axis in 0..3 {
        let upper = shape[axis].saturating_sub(1) as f64;
        out[axis] = rint(position[axis]).clamp(0.0, upper) as usize;
    }
    out
}

fn weighted_mean_index<I>(voxels: I) -> Result<Vec3>
where
    I: Iterator<Item = ((usize, usize, usize), f64)>,
{
    let mut total = 0.0;
    let mut acc = [0.0; 3];

    for ((i, j, k), w) in voxels {
        total += w;
        acc[0] += i as f64 * w;
        acc[1] += j as f64 * w;
        acc[2] += k as f64 * w;
    }

    if total == 0.0 || !total.is_finite() {
        return Err(CdiError::EmptyData(format!(
            "center of mass undefined (total weight = {})",
            total
        )));
    }

    Ok([acc[0] / total, acc[1] / total, acc[2] / total])
}

/// 每个非零体素到质心的欧氏距离；零体素保持为 0
pub fn compute_distance_from_com(data: &Array3<f64>, com: Option<Vec3>) -> Result<Array3<f64>> {
    let com = match com {
        Some(c) => c,
        None => center_of_mass(data)?,
    };

    let mut distances = Array3::<f64>::zeros(data.raw_dim());
    for ((i, j, k), &v) in data.indexed_iter() {
        if v != 0.0 {
            let d = [i as f64 - com[0], j as f64 - com[1], k as f64 - com[2]];
            distances[[i, j, k]] = norm(&d);
        }
    }

    Ok(distances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn apply(matrix: &Matrix3, v: &Vec3) -> Vec3 {
        [dot(&matrix[0], v), dot(&matrix[1], v), dot(&matrix[2], v)]
    }

    fn approx(a: &Vec3, b: &Vec3) -> bool {
        (0..3).all(|i| (a[i] - b[i]).abs() < 1e-9)
    }

    #[test]
    fn test_unit_vector_and_angle() {
        let u = unit_vector(&[3.0, 0.0, 4.0]).unwrap();
        assert!(approx(&u, &[0.6, 0.0, 0.8]));

        let theta = angle(&[1.0, 0.0, 0.0], &[0.0, 2.0, 0.0]).unwrap();
        assert!((theta - FRAC_PI_2).abs() < 1e-12);

        assert!(unit_vector(&[0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_rotation_maps_v1_onto_v2() {
        let v1 = [1.0, 2.0, 3.0];
        let v2 = [-2.0, 0.5, 1.0];

        let r = v1_to_v2_rotation_matrix(&v1, &v2).unwrap();
        let rotated = apply(&r, &unit_vector(&v1).unwrap());

        assert!(approx(&rotated, &unit_vector(&v2).unwrap()));
    }

    #[test]
    fn test_rotation_x_to_y() {
        let r = v1_to_v2_rotation_matrix(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).unwrap();
        // 绕 z 轴旋转 90°
        assert!(approx(&r[0], &[0.0, -1.0, 0.0]));
        assert!(approx(&r[1], &[1.0, 0.0, 0.0]));
        assert!(approx(&r[2], &[0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_rotation_parallel_is_identity() {
        let r = v1_to_v2_rotation_matrix(&[0.0, 0.0, 1.0], &[0.0, 0.0, 5.0]).unwrap();
        assert_eq!(r, identity());

        assert!(v1_to_v2_rotation_matrix(&[0.0, 0.0, 1.0], &[0.0, 0.0, -1.0]).is_err());
    }

    #[test]
    fn test_find_max_pos_ignores_nan() {
        let mut data = Array3::<f64>::zeros((3, 4, 5));
        data[[0, 0, 0]] = f64::NAN;
        data[[2, 1, 3]] = 7.0;
        data[[2, 3, 4]] = 7.0;

        // 相同最大值取 C 顺序中的第一个
        assert_eq!(find_max_pos(&data).unwrap(), [2, 1, 3]);
    }

    #[test]
    fn test_center_of_mass() {
        let mut data = Array3::<f64>::zeros((5, 5, 5));
        data[[1, 2, 3]] = 1.0;
        data[[3, 2, 1]] = 1.0;

        let com = center_of_mass(&data).unwrap();
        assert!(approx(&com, &[2.0, 2.0, 2.0]));

        assert!(center_of_mass(&Array3::zeros((2, 2, 2))).is_err());
    }

    #[test]
    fn test_nan_center_of_mass() {
        let mut data = Array3::<f64>::from_elem((3, 3, 3), f64::NAN);
        data[[0, 0, 0]] = 1.0;
        data[[2, 2, 2]] = 3.0;

        let com = nan_center_of_mass(&data).unwrap();
        assert!(approx(&com, &[1.5, 1.5, 1.5]));
        assert_eq!(round_position(&com, [3, 3, 3]), [2, 2, 2]);
    }

    #[test]
    fn test_round_position_clamps() {
        assert_eq!(round_position(&[-0.7, 2.5, 10.2], [4, 4, 4]), [0, 2, 3]);
    }

    #[test]
    fn test_compute_distance_from_com() {
        let mut data = Array3::<f64>::zeros((3, 3, 3));
        data[[0, 1, 1]] = 1.0;
        data[[2, 1, 1]] = 1.0;

        let d = compute_distance_from_com(&data, None).unwrap();
        assert!((d[[0, 1, 1]] - 1.0).abs() < 1e-12);
        assert!((d[[2, 1, 1]] - 1.0).abs() < 1e-12);
        assert_eq!(d[[1, 1, 1]], 0.0);

        let d = compute_distance_from_com(&data, Some([0.0, 1.0, 1.0])).unwrap();
        assert!((d[[2, 1, 1]] - 2.0).abs() < 1e-12);
    }
}
