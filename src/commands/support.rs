//! # support 命令实现
//!
//! 由重构振幅计算支撑区并保存。
//!
//! ## 功能
//! - 等值面给定或自动估计
//! - 可选外壳、膨胀
//! - 推荐更紧凑的数组形状
//!
//! ## 依赖关系
//! - 使用 `cli/support.rs` 定义的参数
//! - 使用 `io/npy.rs`, `volume/support.rs`, `volume/isosurface.rs`

use crate::cli::support::SupportArgs;
use crate::error::Result;
use crate::io;
use crate::utils::output;
use crate::volume::support::{
    find_hull, find_suitable_array_shape, make_support, size_up_support, zero_to_nan, HullOptions,
};
use crate::volume::find_isosurface;

/// 执行 support 命令
pub fn execute(args: SupportArgs) -> Result<()> {
    output::pretty_print("Support");

    let amplitude = io::load_real_volume(&args.input, args.key.as_deref())?;
    output::print_info(&format!(
        "Loaded amplitude {:?} from '{}'",
        amplitude.dim(),
        args.input.display()
    ));

    let isosurface = match args.isosurface {
        Some(value) => value,
        None => {
            let estimate = find_isosurface(&amplitude, args.nbins, args.sigma_criterion)?;
            output::print_info(&format!(
                "Estimated isosurface: {:.4} (peak {:.4}, sigma {:.4})",
                estimate.isosurface, estimate.peak, estimate.sigma
            ));
            estimate.isosurface
        }
    };

    let mut support = make_support(&amplitude, isosurface, false)?;

    if args.size_up {
        support = size_up_support(&support);
        log::info!("support dilated by one voxel");
    }

    // 推荐形状基于完整支撑区计算，失败时只提示
    let suggested = match find_suitable_array_shape(&support, args.padding, !args.asymmetric) {
        Ok(shape) => Some(shape),
        Err(e) => {
            output::print_warning(&format!("No array shape suggested: {}", e));
            None
        }
    };

    if args.hull {
        support = find_hull(
            &support,
            &HullOptions {
                threshold: args.hull_threshold,
                kernel_size: args.kernel_size,
                boolean_values: true,
                nan_value: false,
            },
        )?;
    }

    let voxels = support.iter().filter(|&&v| v == 1.0).count();
    if args.nan_values {
        support = zero_to_nan(&support, true);
    }

    io::save_npy(&args.output, &support)?;

    output::print_separator();
    output::print_info(&format!("Isosurface: {:.4}", isosurface));
    output::print_info(&format!("Support voxels: {}", voxels));
    if let Some(shape) = suggested {
        output::print_info(&format!(
            "Suggested array shape: ({}, {}, {})",
            shape[0], shape[1], shape[2]
        ));
    }
    output::print_saved(
        &args.input.display().to_string(),
        &args.output.display().to_string(),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{s, Array3};
    use std::path::Path;
    use tempfile::tempdir;

    fn write_cube(path: &Path) {
        let mut amplitude = Array3::<f64>::zeros((12, 12, 12));
        amplitude.slice_mut(s![3..9, 3..9, 3..9]).fill(0.8);
        amplitude[[6, 6, 6]] = 1.0;
        io::save_npy(path, &amplitude).unwrap();
    }

    fn args(input: &Path, output: &Path) -> SupportArgs {
        SupportArgs {
            input: input.to_path_buf(),
            key: None,
            output: output.to_path_buf(),
            isosurface: Some(0.5),
            nbins: 100,
            sigma_criterion: 3.0,
            nan_values: false,
            hull: false,
            hull_threshold: 18.0,
            kernel_size: 3,
            size_up: false,
            padding: None,
            asymmetric: false,
        }
    }

    #[test]
    fn test_execute_writes_support() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("amp.npy");
        let output = dir.path().join("support.npy");
        write_cube(&input);

        execute(args(&input, &output)).unwrap();

        let support = io::load_real_volume(&output, None).unwrap();
        assert_eq!(support.sum(), 216.0);
        assert_eq!(support[[0, 0, 0]], 0.0);
    }

    #[test]
    fn test_execute_nan_values_outside() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("amp.npy");
        let output = dir.path().join("support.npy");
        write_cube(&input);

        execute(SupportArgs {
            nan_values: true,
            ..args(&input, &output)
        })
        .unwrap();

        let support = io::load_real_volume(&output, None).unwrap();
        assert!(support[[0, 0, 0]].is_nan());
        assert_eq!(support[[6, 6, 6]], 1.0);
    }

    #[test]
    fn test_execute_saves_empty_support() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("amp.npy");
        let output = dir.path().join("support.npy");
        write_cube(&input);

        // 阈值高于归一化最大值：支撑区为空，但仍然保存
        execute(SupportArgs {
            isosurface: Some(1.5),
            ..args(&input, &output)
        })
        .unwrap();

        let support = io::load_real_volume(&output, None).unwrap();
        assert_eq!(support.dim(), (12, 12, 12));
        assert_eq!(support.sum(), 0.0);
    }
}
