//! # angles 命令实现
//!
//! 按 Bragg 峰相对直束的像素偏移校正探测器角度，结果以表格输出。
//!
//! ## 依赖关系
//! - 使用 `cli/angles.rs` 定义的参数
//! - 使用 `detector.rs`

use crate::cli::angles::AnglesArgs;
use crate::detector::{compute_corrected_angles, CorrectedAngles, DetectorGeometry};
use crate::error::Result;
use crate::utils::output;

use tabled::{Table, Tabled};

/// 角度表格行
#[derive(Debug, Clone, Tabled)]
struct AngleRow {
    #[tabled(rename = "Angle")]
    name: &'static str,
    #[tabled(rename = "Recorded (°)")]
    recorded: String,
    #[tabled(rename = "Correction (°)")]
    correction: String,
    #[tabled(rename = "Corrected (°)")]
    corrected: String,
}

/// 执行 angles 命令
pub fn execute(args: AnglesArgs) -> Result<()> {
    output::print_header("Detector Angle Correction");

    let geometry = DetectorGeometry::new(args.distance, args.direct_beam, args.pixel_size)?;
    output::print_info(&format!(
        "Detector distance {} m, pixel size {:e} m",
        geometry.distance, geometry.pixel_size
    ));

    let angles = compute_corrected_angles(args.inplane, args.outofplane, args.detector, &geometry);

    println!("{}", Table::new(rows(args.inplane, args.outofplane, &angles)));

    output::print_done(&format!(
        "Corrected angles: in-plane {:.4}°, out-of-plane {:.4}°",
        angles.inplane, angles.outofplane
    ));

    Ok(())
}

fn rows(inplane: f64, outofplane: f64, angles: &CorrectedAngles) -> Vec<AngleRow> {
    vec![
        AngleRow {
            name: "in-plane",
            recorded: format!("{:.4}", inplane),
            correction: format!("{:.4}", angles.inplane_correction),
            corrected: format!("{:.4}", angles.inplane),
        },
        AngleRow {
            name: "out-of-plane",
            recorded: format!("{:.4}", outofplane),
            correction: format!("{:.4}", angles.outofplane_correction),
            corrected: format!("{:.4}", angles.outofplane),
        },
    ]
}
