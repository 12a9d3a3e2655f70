//! # center 命令实现
//!
//! 将体数据滚动到参考位置居中，可选裁剪或填充到给定形状。
//!
//! ## 依赖关系
//! - 使用 `cli/center.rs` 定义的参数
//! - 使用 `io/npy.rs`, `volume/reshape.rs`

use crate::cli::center::CenterArgs;
use crate::error::Result;
use crate::io;
use crate::utils::output;
use crate::volume::reshape::{center_at_com, shape_of};
use crate::volume::{center, crop_at_center, symmetric_pad, CenterReference, Shape3};

use ndarray::Array3;

/// 执行 center 命令
pub fn execute(args: CenterArgs) -> Result<()> {
    output::print_header("Centering Volume");

    let data = io::load_real_volume(&args.input, args.key.as_deref())?;
    output::print_info(&format!(
        "Loaded {:?} from '{}'",
        data.dim(),
        args.input.display()
    ));

    let (centered, former) = match (args.reference, args.iterate) {
        (CenterReference::Com, true) => center_at_com(&data)?,
        (reference, iterate) => {
            if iterate {
                output::print_warning("--iterate only applies to 'com', centering once");
            }
            center(&data, reference)?
        }
    };

    output::print_info(&format!(
        "Reference '{}' was at ({:.2}, {:.2}, {:.2})",
        args.reference, former[0], former[1], former[2]
    ));

    let result = match args.shape {
        Some(shape) => reshape_to(centered, shape, args.pad_value)?,
        None => centered,
    };

    io::save_npy(&args.output, &result)?;
    output::print_saved(
        &args.input.display().to_string(),
        &args.output.display().to_string(),
    );
    output::print_done(&format!("Output shape {:?}", result.dim()));

    Ok(())
}

/// 逐轴裁剪或填充到目标形状
fn reshape_to(data: Array3<f64>, target: Shape3, pad_value: f64) -> Result<Array3<f64>> {
    let shape = shape_of(&data);

    // 先裁剪过大的轴，再填充过小的轴
    let crop_shape = [
        shape[0].min(target[0]),
        shape[1].min(target[1]),
        shape[2].min(target[2]),
    ];
    let cropped = if crop_shape != shape {
        crop_at_center(&data, crop_shape)
    } else {
        data
    };

    if crop_shape != target {
        symmetric_pad(&cropped, target, pad_value)
    } else {
        Ok(cropped)
    }
}
