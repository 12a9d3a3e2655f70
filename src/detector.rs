//! # 探测器角度校正
//!
//! 实验数据文件中记录的探测器角度对应直束位置；感兴趣的点（如 Bragg 峰）
//! 偏离直束时需要按像素偏移量修正角度。
//!
//! ## 依赖关系
//! - 被 `commands/angles.rs` 调用
//! - 无外部模块依赖

use crate::error::{CdiError, Result};

/// 默认像素尺寸（m），对应 Maxipix / Eiger 55 µm 像素
pub const DEFAULT_PIXEL_SIZE: f64 = 55e-6;

/// 探测器几何
#[derive(Debug, Clone, Copy)]
pub struct DetectorGeometry {
    /// 样品到探测器距离（m）
    pub distance: f64,
    /// 直束在探测器上的位置 (像素)，顺序与实验文件一致
    pub direct_beam_position: [f64; 2],
    /// 像素尺寸（m）
    pub pixel_size: f64,
}

impl DetectorGeometry {
    pub fn new(distance: f64, direct_beam_position: [f64; 2], pixel_size: f64) -> Result<Self> {
        if distance.is_nan() || distance <= 0.0 {
            return Err(CdiError::InvalidArgument(format!(
                "detector distance must be positive, got {}",
                distance
            )));
        }
        if pixel_size.is_nan() || pixel_size <= 0.0 {
            return Err(CdiError::InvalidArgument(format!(
                "pixel size must be positive, got {}",
                pixel_size
            )));
        }
        Ok(Self {
            distance,
            direct_beam_position,
            pixel_size,
        })
    }

    /// 像素偏移对应的角度（度）
    fn offset_angle(&self, pixels: f64) -> f64 {
        (pixels * self.pixel_size / self.distance).atan().to_degrees()
    }
}

/// 校正结果（度）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectedAngles {
    pub inplane: f64,
    pub outofplane: f64,
    pub inplane_correction: f64,
    pub outofplane_correction: f64,
}

/// 计算校正后的探测器角度
///
/// `detector_coordinates` 为感兴趣点在探测器上的 (行, 列) 像素坐标。
/// 面内校正使用列坐标与直束位置的第一个分量，面外校正使用行坐标与第二个分量。
pub fn compute_corrected_angles(
    inplane_angle: f64,
    outofplane_angle: f64,
    detector_coordinates: [f64; 2],
    geometry: &DetectorGeometry,
) -> CorrectedAngles {
    let inplane_correction =
        geometry.offset_angle(detector_coordinates[1] - geometry.direct_beam_position[0]);
    let outofplane_correction =
        geometry.offset_angle(detector_coordinates[0] - geometry.direct_beam_position[1]);

    let corrected = CorrectedAngles {
        inplane: inplane_angle - inplane_correction,
        outofplane: outofplane_angle - outofplane_correction,
        inplane_correction,
        outofplane_correction,
    };

    log::debug!(
        "in-plane: {} - {} = {}; out-of-plane: {} - {} = {}",
        inplane_angle,
        inplane_correction,
        corrected.inplane,
        outofplane_angle,
        outofplane_correction,
        corrected.outofplane
    );

    corrected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_offset_no_correction() {
        let geometry = DetectorGeometry::new(1.0, [100.0, 200.0], DEFAULT_PIXEL_SIZE).unwrap();
        let angles = compute_corrected_angles(25.0, 12.0, [200.0, 100.0], &geometry);

        assert_eq!(angles.inplane, 25.0);
        assert_eq!(angles.outofplane, 12.0);
    }

    #[test]
    fn test_offset_correction() {
        // 像素偏移 × 像素尺寸 = 距离 -> 45°
        let geometry = DetectorGeometry::new(0.55, [0.0, 0.0], DEFAULT_PIXEL_SIZE).unwrap();
        let angles = compute_corrected_angles(50.0, 30.0, [-10000.0, 10000.0], &geometry);

        assert!((angles.inplane_correction - 45.0).abs() < 1e-9);
        assert!((angles.inplane - 5.0).abs() < 1e-9);
        assert!((angles.outofplane_correction + 45.0).abs() < 1e-9);
        assert!((angles.outofplane - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_geometry() {
        assert!(DetectorGeometry::new(0.0, [0.0, 0.0], DEFAULT_PIXEL_SIZE).is_err());
        assert!(DetectorGeometry::new(1.0, [0.0, 0.0], -1.0).is_err());
        assert!(DetectorGeometry::new(f64::NAN, [0.0, 0.0], 1.0).is_err());
    }
}
