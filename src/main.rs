//! # cdiutils - BCDI 重构结果分析工具
//!
//! 对已重构的 Bragg 相干衍射成像 (BCDI) 数据做常用的后处理与分析，
//! 统一成单一可执行文件。
//!
//! ## 子命令
//! - `support`    - 由振幅生成支撑区（可选外壳、膨胀）
//! - `isosurface` - 等值面估计（单文件或批量）
//! - `center`     - 体数据居中、裁剪或填充
//! - `crop-peak`  - Bragg 峰链式居中裁剪
//! - `angles`     - 探测器角度校正
//! - `quiver`     - 截面相位梯度 quiver 图
//!
//! 算法与命令实现位于库 crate（`lib.rs`），此处只负责参数解析、日志初始化与退出码。

use clap::Parser;
use cdiutils::cli::Cli;
use cdiutils::{commands, utils};
use log::LevelFilter;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}

/// `-v` 提高日志级别，`RUST_LOG` 优先
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
