//! # crop-peak 命令实现
//!
//! 对衍射强度做 Bragg 峰链式居中并裁剪。
//!
//! ## 依赖关系
//! - 使用 `cli/crop_peak.rs` 定义的参数
//! - 使用 `volume/centering.rs`

use crate::cli::crop_peak::CropPeakArgs;
use crate::error::{CdiError, Result};
use crate::io;
use crate::utils::output;
use crate::volume::centering::parse_methods;
use crate::volume::reshape::{shape_for_safe_centered_cropping, shape_of};
use crate::volume::PeakCenteringHandler;

/// 执行 crop-peak 命令
pub fn execute(args: CropPeakArgs) -> Result<()> {
    output::print_header("Bragg Peak Centering");

    let methods = parse_methods(&args.methods).map_err(CdiError::InvalidArgument)?;

    let data = io::load_real_volume(&args.input, args.key.as_deref())?;
    output::print_info(&format!(
        "Loaded intensity {:?} from '{}'",
        data.dim(),
        args.input.display()
    ));

    let method_names: Vec<String> = methods.iter().map(|m| m.to_string()).collect();
    output::print_info(&format!("Methods: {}", method_names.join(" -> ")));

    let (cropped, position) = PeakCenteringHandler::chain_centering(&data, args.shape, &methods)?;

    let shape = cropped.dim();
    if [shape.0, shape.1, shape.2] != args.shape {
        output::print_warning(&format!(
            "Peak is too close to the border: output shape is {:?} instead of {:?}",
            shape, args.shape
        ));
    }

    io::save_npy(&args.output, &cropped)?;

    let safe = shape_for_safe_centered_cropping(
        shape_of(&data),
        [position[0] as f64, position[1] as f64, position[2] as f64],
        None,
    );
    output::print_info(&format!(
        "Peak position: ({}, {}, {})",
        position[0], position[1], position[2]
    ));
    output::print_info(&format!(
        "Largest shape centred on the peak: ({}, {}, {})",
        safe[0], safe[1], safe[2]
    ));
    output::print_saved(
        &args.input.display().to_string(),
        &args.output.display().to_string(),
    );

    Ok(())
}
