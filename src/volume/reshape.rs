//! # 居中、裁剪与填充
//!
//! 约定与 numpy 一致：`roll` 为循环平移；裁剪保持输入中心
//! (`shape // 2`) 仍为输出中心；填充在奇数差值时多补在高索引一侧。
//!
//! ## 依赖关系
//! - 被 `commands/center.rs`、`commands/crop_peak.rs` 使用
//! - 使用 `volume/geometry.rs` 计算参考位置

use crate::error::{CdiError, Result};
use crate::volume::geometry::{center_of_mass, find_max_pos, Vec3};
use crate::volume::{rint, Shape3};

use ndarray::{s, Array3};
use std::fmt;
use std::str::FromStr;

/// 居中参考位置
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CenterReference {
    /// 质心
    Com,
    /// 最大值
    Max,
    /// 指定坐标
    Position(Vec3),
}

impl fmt::Display for CenterReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CenterReference::Com => write!(f, "com"),
            CenterReference::Max => write!(f, "max"),
            CenterReference::Position(p) => write!(f, "({}, {}, {})", p[0], p[1], p[2]),
        }
    }
}

impl FromStr for CenterReference {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "com" => Ok(CenterReference::Com),
            "max" => Ok(CenterReference::Max),
            other => {
                let values: Vec<f64> = other
                    .split(',')
                    .map(|v| v.trim().parse::<f64>())
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|_| invalid_reference(s))?;
                match values.as_slice() {
                    [a, b, c] => Ok(CenterReference::Position([*a, *b, *c])),
                    _ => Err(invalid_reference(s)),
                }
            }
        }
    }
}

fn invalid_reference(s: &str) -> String {
    format!(
        "'{}' is not a valid reference: use 'com', 'max' or three comma-separated coordinates",
        s
    )
}

/// 安全居中裁剪的最小形状
///
/// 每个轴取 `2·min(position, shape - position)`，保证 `roll` 时数据不会从一侧绕到另一侧；
/// 若提供 `final_shape` 则再与其取较小值。
pub fn shape_for_safe_centered_cropping(
    data_shape: Shape3,
    position: Vec3,
    final_shape: Option<Shape3>,
) -> Shape3 {
    let mut secured = [0usize; 3];
    for axis in 0..3 {
        let size = data_shape[axis] as f64;
        let margin = position[axis].min(size - position[axis]);
        secured[axis] = rint(2.0 * margin).max(0.0) as usize;
        if let Some(f) = final_shape {
            secured[axis] = secured[axis].min(f[axis]);
        }
    }
    secured
}

/// 三个轴上的循环平移（`np.roll`）
pub fn roll<A: Clone>(data: &Array3<A>, shifts: [isize; 3]) -> Array3<A> {
    let (n0, n1, n2) = data.dim();
    let wrap = |i: usize, shift: isize, n: usize| -> usize {
        (i as isize - shift).rem_euclid(n as isize) as usize
    };

    Array3::from_shape_fn((n0, n1, n2), |(i, j, k)| {
        data[[wrap(i, shifts[0], n0), wrap(j, shifts[1], n1), wrap(k, shifts[2], n2)]].clone()
    })
}

/// 将参考位置移到数组中心所需的平移量
pub fn shifts_to_center(shape: Shape3, reference: &Vec3) -> [isize; 3] {
    let mut shifts = [0isize; 3];
    for axis in 0..3 {
        shifts[axis] = rint(shape[axis] as f64 / 2.0 - reference[axis]) as isize;
    }
    shifts
}

/// 计算参考位置
pub fn reference_position(data: &Array3<f64>, reference: CenterReference) -> Result<Vec3> {
    match reference {
        CenterReference::Com => center_of_mass(data),
        CenterReference::Max => {
            let [i, j, k] = find_max_pos(data)?;
            Ok([i as f64, j as f64, k as f64])
        }
        CenterReference::Position(p) => Ok(p),
    }
}

/// 将质心或最大值（或指定坐标）平移到数组中心
///
/// 返回居中后的数组以及原参考位置。
pub fn center(data: &Array3<f64>, reference: CenterReference) -> Result<(Array3<f64>, Vec3)> {
    if data.is_empty() {
        return Err(CdiError::EmptyData("cannot center an empty volume".into()));
    }
    let position = reference_position(data, reference)?;
    let shifts = shifts_to_center(shape_of(data), &position);
    Ok((roll(data, shifts), position))
}

/// 反复按质心居中直到平移量为 0
pub fn center_at_com(data: &Array3<f64>) -> Result<(Array3<f64>, Vec3)> {
    const MAX_ITERATIONS: usize = 10;

    let shape = shape_of(data);
    let mut current = data.clone();

    for iteration in 0..MAX_ITERATIONS {
        let com = center_of_mass(&current)?;
        let shifts = shifts_to_center(shape, &com);
        log::debug!(
            "center_at_com iteration {}: com = {:?}, shifts = {:?}",
            iteration,
            com,
            shifts
        );
        if shifts == [0, 0, 0] {
            return Ok((current, com));
        }
        current = roll(&current, shifts);
    }

    log::warn!(
        "center of mass did not converge after {} iterations",
        MAX_ITERATIONS
    );
    let com = center_of_mass(&current)?;
    Ok((current, com))
}

/// 对称填充到 `final_shape`
pub fn symmetric_pad<A: Clone>(
    data: &Array3<A>,
    final_shape: Shape3,
    value: A,
) -> Result<Array3<A>> {
    let shape = shape_of(data);
    let mut before = [0usize; 3];

    for axis in 0..3 {
        if final_shape[axis] < shape[axis] {
            return Err(CdiError::InvalidShape(format!(
                "cannot pad {:?} to the smaller shape {:?}",
                shape, final_shape
            )));
        }
        before[axis] = (final_shape[axis] - shape[axis]) / 2;
    }

    let mut padded = Array3::from_elem((final_shape[0], final_shape[1], final_shape[2]), value);
    padded
        .slice_mut(s![
            before[0]..before[0] + shape[0],
            before[1]..before[1] + shape[1],
            before[2]..before[2] + shape[2]
        ])
        .assign(data);

    Ok(padded)
}

/// 以数组中心为中心裁剪到 `final_shape`
///
/// 若 `final_shape` 某个轴大于输入，打印警告并原样返回。
pub fn crop_at_center<A: Clone>(data: &Array3<A>, final_shape: Shape3) -> Array3<A> {
    let shape = shape_of(data);

    if (0..3).any(|axis| final_shape[axis] > shape[axis]) {
        log::warn!(
            "One of the axis of the final shape is larger than the initial axis \
             (initial shape: {:?}, final shape: {:?}). Did not proceed to cropping.",
            shape,
            final_shape
        );
        return data.clone();
    }

    let mut lo = [0usize; 3];
    let mut hi = [0usize; 3];
    for axis in 0..3 {
        let c = shape[axis] / 2;
        let half = final_shape[axis] / 2;
        lo[axis] = c - half;
        hi[axis] = (c + half + final_shape[axis] % 2).min(shape[axis]);
    }

    data.slice(s![lo[0]..hi[0], lo[1]..hi[1], lo[2]..hi[2]])
        .to_owned()
}

/// 数组形状
pub fn shape_of<A>(data: &Array3<A>) -> Shape3 {
    let (a, b, c) = data.dim();
    [a, b, c]
}
