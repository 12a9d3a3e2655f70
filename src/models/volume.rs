//! # 体数据模型
//!
//! 重构结果可以是实数体（振幅、支撑区、应变）或复数体（重构物体）。
//!
//! ## 依赖关系
//! - 被 `io/npy.rs` 构造
//! - 被 `commands/` 使用
//! - 无外部模块依赖（除 `ndarray`、`num-complex`）

use ndarray::Array3;
use num_complex::Complex64;

/// 三维体数据
#[derive(Debug, Clone)]
pub enum Volume {
    /// 实数体
    Real(Array3<f64>),
    /// 复数体
    Complex(Array3<Complex64>),
}

impl Volume {
    /// 数组形状
    pub fn shape(&self) -> [usize; 3] {
        let (a, b, c) = match self {
            Volume::Real(data) => data.dim(),
            Volume::Complex(data) => data.dim(),
        };
        [a, b, c]
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Volume::Complex(_))
    }

    /// 振幅：复数取模，实数取原值
    pub fn amplitude(&self) -> Array3<f64> {
        match self {
            Volume::Real(data) => data.clone(),
            Volume::Complex(data) => data.mapv(|z| z.norm()),
        }
    }

    /// 相位：复数取辐角，实数视为相位为 0
    pub fn phase(&self) -> Array3<f64> {
        match self {
            Volume::Real(data) => Array3::zeros(data.raw_dim()),
            Volume::Complex(data) => data.mapv(|z| z.arg()),
        }
    }

    /// dtype 描述
    pub fn kind(&self) -> &'static str {
        match self {
            Volume::Real(_) => "real",
            Volume::Complex(_) => "complex",
        }
    }
}

impl From<Array3<f64>> for Volume {
    fn from(data: Array3<f64>) -> Self {
        Volume::Real(data)
    }
}

impl From<Array3<Complex64>> for Volume {
    fn from(data: Array3<Complex64>) -> Self {
        Volume::Complex(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_complex_amplitude_and_phase() {
        let mut data = Array3::<Complex64>::zeros((2, 1, 1));
        data[[0, 0, 0]] = Complex64::new(3.0, 4.0);
        data[[1, 0, 0]] = Complex64::new(0.0, 2.0);

        let volume = Volume::from(data);
        assert!(volume.is_complex());
        assert_eq!(volume.shape(), [2, 1, 1]);

        let amp = volume.amplitude();
        assert!((amp[[0, 0, 0]] - 5.0).abs() < 1e-12);
        assert!((volume.phase()[[1, 0, 0]] - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_real_volume_has_zero_phase() {
        let volume = Volume::from(Array3::<f64>::from_elem((2, 2, 2), 4.0));
        assert_eq!(volume.kind(), "real");
        assert_eq!(volume.amplitude()[[1, 1, 1]], 4.0);
        assert!(volume.phase().iter().all(|&p| p == 0.0));
    }
}
