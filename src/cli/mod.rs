//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `support`: 振幅 -> 支撑区
//! - `isosurface`: 等值面估计（单文件或批量）
//! - `center`: 体数据居中、裁剪或填充
//! - `crop-peak`: Bragg 峰链式居中裁剪
//! - `angles`: 探测器角度校正
//! - `quiver`: 截面相位梯度 quiver 图
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: support, isosurface, center, crop_peak, angles, quiver

pub mod angles;
pub mod center;
pub mod crop_peak;
pub mod isosurface;
pub mod quiver;
pub mod support;

use clap::{ArgAction, Parser, Subcommand};
use regex::Regex;

/// cdiutils - BCDI 重构结果分析工具
#[derive(Parser)]
#[command(name = "cdiutils")]
#[command(author = "Clement Atlan")]
#[command(version)]
#[command(about = "Convenient functions to analyse processed BCDI data", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Compute a support (and optionally its hull) from a reconstructed amplitude
    Support(support::SupportArgs),

    /// Estimate the isosurface of reconstructed amplitudes (single file or directory)
    Isosurface(isosurface::IsosurfaceArgs),

    /// Center a volume on its center of mass, maximum or a given position
    Center(center::CenterArgs),

    /// Center and crop a Bragg peak by chaining max / com / position methods
    CropPeak(crop_peak::CropPeakArgs),

    /// Correct detector angles for the offset between Bragg peak and direct beam
    Angles(angles::AnglesArgs),

    /// Plot the in-plane phase gradient of a cross section as a quiver plot
    Quiver(quiver::QuiverArgs),
}

/// 切分 `"a,b,c"`、`"axbxc"`、`"(a, b, c)"` 等形式的多值输入
fn split_values(input: &str) -> Result<Vec<&str>, String> {
    let re = Regex::new(r"[\s,x]+").map_err(|e| e.to_string())?;
    let trimmed = input
        .trim()
        .trim_start_matches(|c: char| c == '(' || c == '[')
        .trim_end_matches(|c: char| c == ')' || c == ']');
    Ok(re.split(trimmed).filter(|s| !s.is_empty()).collect())
}

/// 解析三维形状（如 `200,200,200`）
pub fn parse_shape(input: &str) -> Result<[usize; 3], String> {
    let values = split_values(input)?
        .into_iter()
        .map(|v| v.parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid_shape(input))?;

    match values.as_slice() {
        [a, b, c] if *a > 0 && *b > 0 && *c > 0 => Ok([*a, *b, *c]),
        _ => Err(invalid_shape(input)),
    }
}

fn invalid_shape(input: &str) -> String {
    format!(
        "Invalid shape '{}'. Use three positive integers (e.g., 200,200,200)",
        input
    )
}

/// 解析二维像素坐标（如 `256.5,301`）
pub fn parse_pair(input: &str) -> Result<[f64; 2], String> {
    let values = split_values(input)?
        .into_iter()
        .map(|v| v.parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid_pair(input))?;

    match values.as_slice() {
        [a, b] => Ok([*a, *b]),
        _ => Err(invalid_pair(input)),
    }
}

fn invalid_pair(input: &str) -> String {
    format!(
        "Invalid pixel position '{}'. Use two comma-separated numbers (e.g., 256,301.5)",
        input
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_shape_forms() {
        assert_eq!(parse_shape("200,200,200"), Ok([200, 200, 200]));
        assert_eq!(parse_shape("64x128x96"), Ok([64, 128, 96]));
        assert_eq!(parse_shape("(10, 20, 30)"), Ok([10, 20, 30]));
        assert!(parse_shape("10,20").is_err());
        assert!(parse_shape("10,0,20").is_err());
        assert!(parse_shape("a,b,c").is_err());
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("256.5, 301"), Ok([256.5, 301.0]));
        assert!(parse_pair("1,2,3").is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from([
            "cdiutils",
            "angles",
            "--inplane",
            "25",
            "--outofplane",
            "12",
            "--detector",
            "200,100",
            "--direct-beam",
            "100,200",
            "--distance",
            "1.2",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
