//! # 截面相位梯度
//!
//! 为 cross-section quiver 图提取某个轴上的二维截面，并计算截面内的相位梯度。
//! 梯度与 `np.gradient` 一致：内部为中心差分，边界为单侧差分；
//! 相位差先折回到 `[-π, π)` 以避免相位卷绕造成的跳变。
//!
//! ## 依赖关系
//! - 被 `commands/quiver.rs` 调用
//! - 结果被 `plot/quiver.rs` 绘制

use crate::error::{CdiError, Result};
use crate::volume::geometry::center_of_mass;
use crate::volume::reshape::shape_of;
use crate::volume::rint;

use ndarray::{Array2, Array3, ArrayView1, Axis, Zip};
use std::f64::consts::PI;

/// 截面数据
#[derive(Debug, Clone)]
pub struct CrossSection {
    /// 截面法向轴
    pub axis: usize,
    /// 截面在该轴上的索引
    pub index: usize,
    /// 背景标量场（支撑区外为 NaN）
    pub background: Array2<f64>,
    /// 沿截面列方向（水平）的梯度分量
    pub u: Array2<f64>,
    /// 沿截面行方向（竖直）的梯度分量
    pub v: Array2<f64>,
}

impl CrossSection {
    /// 截面形状 (rows, cols)
    pub fn dim(&self) -> (usize, usize) {
        self.background.dim()
    }

    /// 梯度模长的最大值（忽略 NaN）
    pub fn max_magnitude(&self) -> f64 {
        Zip::from(&self.u)
            .and(&self.v)
            .fold(0.0_f64, |acc, &u, &v| {
                let m = u.hypot(v);
                if m.is_nan() {
                    acc
                } else {
                    acc.max(m)
                }
            })
    }
}

/// 折回到 `[-π, π)`
pub fn wrap_phase(value: f64) -> f64 {
    (value + PI).rem_euclid(2.0 * PI) - PI
}

/// 一维梯度（`np.gradient` 约定）
fn gradient_1d(lane: ArrayView1<'_, f64>, wrapped: bool) -> Vec<f64> {
    let n = lane.len();
    let diff = |a: f64, b: f64| {
        let d = b - a;
        if wrapped {
            wrap_phase(d)
        } else {
            d
        }
    };

    if n < 2 {
        return vec![0.0; n];
    }

    (0..n)
        .map(|i| {
            if i == 0 {
                diff(lane[0], lane[1])
            } else if i == n - 1 {
                diff(lane[n - 2], lane[n - 1])
            } else {
                diff(lane[i - 1], lane[i + 1]) / 2.0
            }
        })
        .collect()
}

/// 二维梯度，返回 (沿行方向, 沿列方向)
pub fn gradient_2d(field: &Array2<f64>, wrapped: bool) -> (Array2<f64>, Array2<f64>) {
    let mut d_rows = Array2::<f64>::zeros(field.raw_dim());
    let mut d_cols = Array2::<f64>::zeros(field.raw_dim());

    for (axis, target) in [(0usize, &mut d_rows), (1usize, &mut d_cols)] {
        for (src, mut dst) in field
            .lanes(Axis(axis))
            .into_iter()
            .zip(target.lanes_mut(Axis(axis)))
        {
            for (d, g) in dst.iter_mut().zip(gradient_1d(src, wrapped)) {
                *d = g;
            }
        }
    }

    (d_rows, d_cols)
}

/// 提取截面并计算相位梯度
///
/// `index` 缺省时取支撑区质心所在的截面。支撑区外的背景与梯度均为 NaN。
pub fn cross_section(
    background: &Array3<f64>,
    phase: &Array3<f64>,
    support: &Array3<f64>,
    axis: usize,
    index: Option<usize>,
) -> Result<CrossSection> {
    if axis > 2 {
        return Err(CdiError::InvalidArgument(format!(
            "slice axis must be 0, 1 or 2, got {}",
            axis
        )));
    }

    let shape = shape_of(background);
    if shape_of(phase) != shape || shape_of(support) != shape {
        return Err(CdiError::ShapeMismatch(format!(
            "background {:?}, phase {:?}, support {:?}",
            shape,
            shape_of(phase),
            shape_of(support)
        )));
    }

    let index = match index {
        Some(i) => i,
        None => {
            let com = center_of_mass(&support.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }))?;
            rint(com[axis]) as usize
        }
    };

    if index >= shape[axis] {
        return Err(CdiError::InvalidArgument(format!(
            "slice index {} is out of range for axis {} (size {})",
            index, axis, shape[axis]
        )));
    }

    let mask = support.index_axis(Axis(axis), index).mapv(|v| v > 0.0);
    let phase_slice = phase.index_axis(Axis(axis), index).to_owned();
    let (d_rows, d_cols) = gradient_2d(&phase_slice, true);

    let outside = |value: f64, inside: bool| if inside { value } else { f64::NAN };
    let background = Zip::from(&background.index_axis(Axis(axis), index))
        .and(&mask)
        .map_collect(|&b, &m| outside(b, m));
    let u = Zip::from(&d_cols)
        .and(&mask)
        .map_collect(|&g, &m| outside(g, m));
    let v = Zip::from(&d_rows)
        .and(&mask)
        .map_collect(|&g, &m| outside(g, m));

    Ok(CrossSection {
        axis,
        index,
        background,
        u,
        v,
    })
}
