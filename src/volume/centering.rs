//! # Bragg 峰链式居中
//!
//! 依次执行多个定位方法（最大值、质心或指定位置），每一步只在上一步
//! 定义的裁剪框内搜索，最终返回框内数据。
//!
//! ## 裁剪约定
//! 参考位置总是落在输出数组的 `output_shape[i] // 2` 处：
//! - `output_shape[i]` 为偶数时中心偏向高索引一侧，中心前的数据比之后多一个；
//! - 为奇数时中心前后数据个数相等。
//!
//! ## 依赖关系
//! - 被 `commands/crop_peak.rs` 使用
//! - 使用 `volume/geometry.rs`

use crate::error::{CdiError, Result};
use crate::volume::geometry::round_position;
use crate::volume::reshape::shape_of;
use crate::volume::Shape3;

use ndarray::{s, Array3};
use std::fmt;
use std::str::FromStr;

/// 峰定位方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CenteringMethod {
    /// 最大值位置
    Max,
    /// 质心（忽略 NaN）
    Com,
    /// 指定整数坐标
    Position(Shape3),
}

impl fmt::Display for CenteringMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CenteringMethod::Max => write!(f, "max"),
            CenteringMethod::Com => write!(f, "com"),
            CenteringMethod::Position(p) => write!(f, "{},{},{}", p[0], p[1], p[2]),
        }
    }
}

impl FromStr for CenteringMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "max" => Ok(CenteringMethod::Max),
            "com" => Ok(CenteringMethod::Com),
            other => {
                let values: Vec<usize> = other
                    .split(',')
                    .map(|v| v.trim().parse::<usize>())
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|_| invalid_method(s))?;
                match values.as_slice() {
                    [a, b, c] => Ok(CenteringMethod::Position([*a, *b, *c])),
                    _ => Err(invalid_method(s)),
                }
            }
        }
    }
}

fn invalid_method(s: &str) -> String {
    format!(
        "'method' cannot be '{}'. It must be either 'max', 'com' or three comma-separated integers",
        s
    )
}

/// 解析分号分隔的方法列表（如 `"max;com;com"`）
pub fn parse_methods(input: &str) -> std::result::Result<Vec<CenteringMethod>, String> {
    input
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// 每个轴的裁剪框 `[lower, upper)`
pub type Bounds = [(usize, usize); 3];

/// Bragg 峰居中处理器
pub struct PeakCenteringHandler;

impl PeakCenteringHandler {
    /// 以 `position` 为参考、`crop` 为前后延伸量计算裁剪框，并截断在数组范围内
    pub fn box_bounds(shape: Shape3, position: Shape3, crop: [[usize; 2]; 3]) -> Bounds {
        let mut bounds = [(0usize, 0usize); 3];
        for axis in 0..3 {
            bounds[axis] = (
                position[axis].saturating_sub(crop[axis][0]),
                (position[axis] + crop[axis][1]).min(shape[axis]),
            );
        }
        bounds
    }

    /// 框外体素被遮罩（`true`）的掩码
    pub fn get_mask(shape: Shape3, position: Shape3, crop: [[usize; 2]; 3]) -> Array3<bool> {
        let b = Self::box_bounds(shape, position, crop);
        let mut mask = Array3::from_elem((shape[0], shape[1], shape[2]), true);
        mask.slice_mut(s![b[0].0..b[0].1, b[1].0..b[1].1, b[2].0..b[2].1])
            .fill(false);
        mask
    }

    /// 在未遮罩的数据中按指定方法定位
    pub fn get_position(
        method: CenteringMethod,
        data: &Array3<f64>,
        mask: Option<&Array3<bool>>,
    ) -> Result<Shape3> {
        let shape = shape_of(data);
        let visible = |idx: (usize, usize, usize), v: f64| -> bool {
            !v.is_nan() && mask.map_or(true, |m| !m[idx])
        };

        match method {
            CenteringMethod::Max => {
                let mut best: Option<((usize, usize, usize), f64)> = None;
                for (idx, &v) in data.indexed_iter() {
                    if !visible(idx, v) {
                        continue;
                    }
                    match best {
                        Some((_, b)) if b >= v => {}
                        _ => best = Some((idx, v)),
                    }
                }
                best.map(|((i, j, k), _)| [i, j, k])
                    .ok_or_else(|| CdiError::EmptyData("no visible voxel to locate".into()))
            }
            CenteringMethod::Com => {
                let mut total = 0.0;
                let mut acc = [0.0; 3];
                for ((i, j, k), &v) in data.indexed_iter() {
                    if !visible((i, j, k), v) {
                        continue;
                    }
                    total += v;
                    acc[0] += i as f64 * v;
                    acc[1] += j as f64 * v;
                    acc[2] += k as f64 * v;
                }
                if total == 0.0 {
                    return Err(CdiError::EmptyData(
                        "center of mass undefined in the visible region".into(),
                    ));
                }
                let com = [acc[0] / total, acc[1] / total, acc[2] / total];
                Ok(round_position(&com, shape))
            }
            CenteringMethod::Position(p) => {
                if (0..3).any(|axis| p[axis] >= shape[axis]) {
                    return Err(CdiError::InvalidArgument(format!(
                        "position {:?} is outside of the data shape {:?}",
                        p, shape
                    )));
                }
                Ok(p)
            }
        }
    }

    /// 链式居中
    ///
    /// 返回最终裁剪框内的数据与最后一个方法得到的位置。若裁剪框碰到数组边界，
    /// 输出形状会小于 `output_shape`。
    pub fn chain_centering(
        data: &Array3<f64>,
        output_shape: Shape3,
        methods: &[CenteringMethod],
    ) -> Result<(Array3<f64>, Shape3)> {
        if methods.is_empty() {
            return Err(CdiError::InvalidArgument(
                "at least one centering method is required".into(),
            ));
        }

        let shape = shape_of(data);
        let mut crop = [[0usize; 2]; 3];
        for axis in 0..3 {
            let half = output_shape[axis] / 2;
            crop[axis] = [half, half + output_shape[axis] % 2];
        }

        // 第一个方法在完整数据上执行
        let mut mask: Option<Array3<bool>> = None;
        let mut position = [0usize; 3];

        for method in methods {
            position = Self::get_position(*method, data, mask.as_ref())?;
            log::info!("Centering with method: {} -> {:?}", method, position);
            mask = Some(Self::get_mask(shape, position, crop));
        }

        let b = Self::box_bounds(shape, position, crop);
        let cropped = data
            .slice(s![b[0].0..b[0].1, b[1].0..b[1].1, b[2].0..b[2].1])
            .to_owned();

        Ok((cropped, position))
    }
}
