//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `io/`, `volume/`, `plot/`, `utils/`
//! - 子模块: support, isosurface, center, crop_peak, angles, quiver

pub mod angles;
pub mod center;
pub mod crop_peak;
pub mod isosurface;
pub mod quiver;
pub mod support;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Support(args) => support::execute(args),
        Commands::Isosurface(args) => isosurface::execute(args),
        Commands::Center(args) => center::execute(args),
        Commands::CropPeak(args) => crop_peak::execute(args),
        Commands::Angles(args) => angles::execute(args),
        Commands::Quiver(args) => quiver::execute(args),
    }
}
