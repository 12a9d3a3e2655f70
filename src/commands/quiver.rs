//! # quiver 命令实现
//!
//! 在重构物体的某个截面上绘制相位梯度箭头，背景为振幅或相位。
//!
//! ## 功能
//! - 支撑区由文件给出，或由振幅的等值面生成
//! - 截面默认取支撑区质心
//! - 输出 PNG 或 SVG
//!
//! ## 依赖关系
//! - 使用 `cli/quiver.rs` 定义的参数
//! - 使用 `volume/gradient.rs` 提取截面，`plot/quiver.rs` 绘图

use crate::cli::quiver::{QuiverArgs, QuiverBackground};
use crate::error::{CdiError, Result};
use crate::io;
use crate::plot::{generate_quiver_plot, QuiverOptions};
use crate::utils::output;
use crate::volume::gradient::cross_section;
use crate::volume::support::{make_support, nan_to_zero};
use crate::volume::{find_isosurface, normalize};

use ndarray::Array3;

/// 执行 quiver 命令
pub fn execute(args: QuiverArgs) -> Result<()> {
    output::print_header("Cross Section Quiver Plot");

    let volume = io::load_volume(&args.input, args.key.as_deref())?;
    output::print_info(&format!(
        "Loaded {} volume {:?} from '{}'",
        volume.kind(),
        volume.shape(),
        args.input.display()
    ));
    if !volume.is_complex() {
        output::print_warning("Real input has no phase: the gradient field is zero");
    }

    let amplitude = volume.amplitude();
    let phase = volume.phase();

    let support = load_or_make_support(&args, &amplitude)?;

    let background = match args.background {
        QuiverBackground::Amplitude => normalize(&amplitude, false)?,
        QuiverBackground::Phase => phase.clone(),
    };

    let section = cross_section(&background, &phase, &support, args.axis, args.index)?;
    output::print_info(&format!(
        "Cross section: axis {}, index {}, max gradient {:.4} rad/pixel",
        section.axis,
        section.index,
        section.max_magnitude()
    ));

    let options = QuiverOptions {
        step: args.step,
        title: args.title.clone().unwrap_or_default(),
        background_label: match args.background {
            QuiverBackground::Amplitude => "normalized amplitude".to_string(),
            QuiverBackground::Phase => "phase (rad)".to_string(),
        },
        width: args.width,
        height: args.height,
    };

    generate_quiver_plot(&section, &options, &args.output)?;
    output::print_success(&format!(
        "Quiver plot ({} background) saved to '{}'",
        args.background,
        args.output.display()
    ));

    Ok(())
}

/// 读取支撑区文件，或以等值面生成支撑区
fn load_or_make_support(args: &QuiverArgs, amplitude: &Array3<f64>) -> Result<Array3<f64>> {
    if let Some(path) = &args.support {
        let support = nan_to_zero(
            &io::load_real_volume(path, args.support_key.as_deref())?,
            false,
        );
        if support.dim() != amplitude.dim() {
            return Err(CdiError::ShapeMismatch(format!(
                "support {:?} does not match the object {:?}",
                support.dim(),
                amplitude.dim()
            )));
        }
        return Ok(support);
    }

    let isosurface = match args.isosurface {
        Some(value) => value,
        None => {
            let estimate = find_isosurface(amplitude, 100, 3.0)?;
            output::print_info(&format!(
                "Support from estimated isosurface {:.4}",
                estimate.isosurface
            ));
            estimate.isosurface
        }
    };

    make_support(amplitude, isosurface, false)
}
