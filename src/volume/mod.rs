//! # 三维体数据处理模块
//!
//! 对重构后的 BCDI 体数据（`Array3<f64>` / `Array3<Complex64>`）提供常用处理函数。
//!
//! ## 子模块
//! - `support`: 支撑区 (support) 与外壳 (hull) 提取
//! - `normalize`: 归一化与对数滤波
//! - `geometry`: 向量、旋转矩阵、质心与极值位置
//! - `reshape`: 居中、裁剪、填充
//! - `centering`: Bragg 峰链式居中
//! - `isosurface`: 等值面阈值估计
//! - `gradient`: 截面相位梯度（用于 quiver 图）
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `plot/` 使用
//! - 使用 `ndarray` 表示体数据

pub mod centering;
pub mod geometry;
pub mod gradient;
pub mod isosurface;
pub mod normalize;
pub mod reshape;
pub mod support;

pub use centering::PeakCenteringHandler;
pub use isosurface::{find_isosurface, IsosurfaceEstimate};
pub use normalize::normalize;
pub use reshape::{center, crop_at_center, symmetric_pad, CenterReference};

use ndarray::{Array3, Axis};

/// 三维整数形状
pub type Shape3 = [usize; 3];

/// 全 1 立方核卷积（边界外补 0）
///
/// 等价于 `scipy.ndimage.convolve(data, ones((k, k, k)), mode="constant", cval=0)`，
/// 利用核的可分离性逐轴做一维滑动求和。`kernel_size` 必须为奇数。
pub(crate) fn box_convolve(data: &Array3<f64>, kernel_size: usize) -> Array3<f64> {
    let half = kernel_size / 2;
    let mut current = data.clone();

    for axis in 0..3 {
        let mut next = Array3::<f64>::zeros(current.raw_dim());
        for (src, mut dst) in current
            .lanes(Axis(axis))
            .into_iter()
            .zip(next.lanes_mut(Axis(axis)))
        {
            let n = src.len();
            for i in 0..n {
                let lo = i.saturating_sub(half);
                let hi = (i + half).min(n - 1);
                dst[i] = (lo..=hi).map(|j| src[j]).sum();
            }
        }
        current = next;
    }

    current
}

/// Python `round()` / `np.rint` 的取整规则（四舍六入五成双）
pub(crate) fn rint(value: f64) -> f64 {
    value.round_ties_even()
}
