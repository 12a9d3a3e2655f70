//! # isosurface 命令实现
//!
//! 估计重构振幅的等值面阈值。
//!
//! ## 功能
//! - 支持单文件和批量目录处理
//! - 并行计算（rayon）
//! - 汇总导出 CSV
//! - 可选输出振幅分布图 (PNG/SVG)
//!
//! ## 依赖关系
//! - 使用 `cli/isosurface.rs` 定义的 IsosurfaceArgs
//! - 使用 `batch/` 模块进行批量处理
//! - 使用 `volume/isosurface.rs` 计算，`plot/histogram.rs` 绘图

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::isosurface::{IsosurfaceArgs, PlotFormat};
use crate::error::{CdiError, Result};
use crate::io;
use crate::models::IsosurfaceRecord;
use crate::plot::generate_isosurface_plot;
use crate::utils::{output, progress};
use crate::volume::find_isosurface;

use std::fs;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

/// 结果表格行
#[derive(Debug, Clone, Tabled)]
struct IsosurfaceRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Isosurface")]
    isosurface: String,
    #[tabled(rename = "Peak")]
    peak: String,
    #[tabled(rename = "FWHM")]
    fwhm: String,
    #[tabled(rename = "Voxels")]
    voxels: usize,
}

impl From<&IsosurfaceRecord> for IsosurfaceRow {
    fn from(record: &IsosurfaceRecord) -> Self {
        Self {
            file: record.file.clone(),
            isosurface: format!("{:.4}", record.isosurface),
            peak: format!("{:.4}", record.peak),
            fwhm: format!("{:.4}", record.fwhm),
            voxels: record.voxels,
        }
    }
}

/// 等值面估计配置
struct EstimateConfig {
    key: Option<String>,
    nbins: usize,
    sigma_criterion: f64,
    plot: bool,
    plot_dir: Option<PathBuf>,
    format: PlotFormat,
    width: u32,
    height: u32,
}

impl EstimateConfig {
    fn from_args(args: &IsosurfaceArgs) -> Self {
        Self {
            key: args.key.clone(),
            nbins: args.nbins,
            sigma_criterion: args.sigma_criterion,
            plot: args.plot,
            plot_dir: args.plot_dir.clone(),
            format: args.format,
            width: args.width,
            height: args.height,
        }
    }

    /// 分布图路径：`<stem>_amplitude_distribution.<ext>`
    fn plot_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "volume".to_string());
        let name = format!("{}_amplitude_distribution.{}", stem, self.format.extension());

        match &self.plot_dir {
            Some(dir) => dir.join(name),
            None => input.with_file_name(name),
        }
    }
}

/// 执行 isosurface 命令
pub fn execute(args: IsosurfaceArgs) -> Result<()> {
    output::pretty_print("Isosurface estimation");

    if let Some(dir) = &args.plot_dir {
        fs::create_dir_all(dir).map_err(|e| CdiError::FileWriteError {
            path: dir.display().to_string(),
            source: e,
        })?;
    }

    if args.input.is_file() {
        execute_single_file(&args)
    } else if args.input.is_dir() {
        execute_batch(&args)
    } else {
        Err(CdiError::FileNotFound {
            path: args.input.display().to_string(),
        })
    }
}

/// 单文件模式
fn execute_single_file(args: &IsosurfaceArgs) -> Result<()> {
    output::print_info(&format!("Single file mode: '{}'", args.input.display()));

    let config = EstimateConfig::from_args(args);
    let spinner = progress::create_spinner("Fitting amplitude distribution");
    let result = estimate_file(&args.input, &config);
    spinner.finish_and_clear();

    let record = result?;
    println!("{}", Table::new([IsosurfaceRow::from(&record)]));

    if config.plot {
        output::print_success(&format!(
            "Distribution plot saved to '{}'",
            config.plot_path(&args.input).display()
        ));
    }

    output::print_done(&format!("Isosurface estimated at {:.4}", record.isosurface));
    Ok(())
}

/// 批量处理模式
fn execute_batch(args: &IsosurfaceArgs) -> Result<()> {
    output::print_info(&format!("Batch mode: directory '{}'", args.input.display()));

    let files = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} volume files", files.len()));

    let config = EstimateConfig::from_args(args);
    let runner = BatchRunner::new(args.jobs);
    log::info!("running with {} jobs", runner.jobs());

    let result = runner.run(&files, |file| match estimate_file(file, &config) {
        Ok(record) => ProcessResult::Success(record),
        Err(CdiError::NotAVolume(shape)) => {
            ProcessResult::Skipped(format!("{}: not a volume {:?}", file.display(), shape))
        }
        Err(e) => ProcessResult::Failed(file.display().to_string(), e.to_string()),
    })?;

    output::print_separator();
    output::print_success(&format!(
        "Batch complete: {} success, {} skipped, {} failed",
        result.success(),
        result.skipped,
        result.failed()
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    if result.outputs.is_empty() {
        return Ok(());
    }

    let rows: Vec<IsosurfaceRow> = result.outputs.iter().map(IsosurfaceRow::from).collect();
    println!("{}", Table::new(&rows));

    io::export::isosurface_records_to_csv(&result.outputs, &args.output)?;
    output::print_success(&format!("Summary saved to '{}'", args.output.display()));

    Ok(())
}

/// 处理单个文件：读取、估计、可选绘图
fn estimate_file(path: &Path, config: &EstimateConfig) -> Result<IsosurfaceRecord> {
    let amplitude = io::load_real_volume(path, config.key.as_deref())?;
    let estimate = find_isosurface(&amplitude, config.nbins, config.sigma_criterion)?;

    if config.plot {
        generate_isosurface_plot(
            &estimate,
            &config.plot_path(path),
            config.width,
            config.height,
        )?;
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    Ok(IsosurfaceRecord::new(name, &estimate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{s, Array3};
    use tempfile::tempdir;

    fn write_particle(path: &Path) {
        let mut amplitude = Array3::<f64>::zeros((24, 24, 24));
        amplitude
            .slice_mut(s![6..18, 6..18, 6..18])
            .indexed_iter_mut()
            .for_each(|((i, j, k), v)| *v = 0.7 + 0.01 * ((i * 5 + j * 3 + k) % 17) as f64);
        amplitude[[12, 12, 12]] = 1.0;
        io::save_npy(path, &amplitude).unwrap();
    }

    fn config(plot_dir: Option<PathBuf>) -> EstimateConfig {
        EstimateConfig {
            key: None,
            nbins: 50,
            sigma_criterion: 3.0,
            plot: plot_dir.is_some(),
            plot_dir,
            format: PlotFormat::Svg,
            width: 600,
            height: 400,
        }
    }

    #[test]
    fn test_plot_path_naming() {
        let cfg = config(None);
        assert_eq!(
            cfg.plot_path(Path::new("data/run_03.npz")),
            PathBuf::from("data/run_03_amplitude_distribution.svg")
        );

        let cfg = config(Some(PathBuf::from("plots")));
        assert_eq!(
            cfg.plot_path(Path::new("data/run_03.npz")),
            PathBuf::from("plots/run_03_amplitude_distribution.svg")
        );
    }

    #[test]
    fn test_estimate_file_with_plot() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("particle.npy");
        write_particle(&input);

        let plots = dir.path().join("plots");
        fs::create_dir_all(&plots).unwrap();
        let record = estimate_file(&input, &config(Some(plots.clone()))).unwrap();

        assert_eq!(record.file, "particle.npy");
        assert!(record.isosurface < record.peak);
        assert!(record.voxels > 0);
        assert!(plots.join("particle_amplitude_distribution.svg").is_file());
    }
}
