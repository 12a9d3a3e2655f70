//! # cdiutils - BCDI 重构结果分析工具
//!
//! 对已重构的 Bragg 相干衍射成像 (BCDI) 数据做常用的后处理与分析。
//! 体数据算法位于 [`volume`] 与 [`detector`]，可直接作为库调用；
//! 命令行入口见 `main.rs`。
//!
//! ## 依赖关系
//! ```text
//! cli/        (命令行参数定义)
//! commands/   (命令执行逻辑)
//!   ├── io/        (npy/npz 读写, CSV 导出)
//!   ├── volume/    (体数据算法)
//!   ├── detector   (角度校正)
//!   ├── plot/      (绘图)
//!   ├── batch/     (批量并行处理)
//!   └── models/    (数据模型)
//! utils/      (工具函数)
//! error.rs    (错误处理)
//! ```

/// 批量文件收集与并行执行
pub mod batch;
/// 命令行参数定义
pub mod cli;
/// 子命令实现
pub mod commands;
/// 探测器角度校正
pub mod detector;
/// 错误类型
pub mod error;
/// 体数据文件读写与导出
pub mod io;
/// 数据模型
pub mod models;
/// 绘图
pub mod plot;
/// 终端输出与进度条
pub mod utils;
/// 三维体数据算法
pub mod volume;

pub use error::{CdiError, Result};
