//! # 数据模型模块
//!
//! 定义统一的体数据表示和分析结果数据模型。
//!
//! ## 依赖关系
//! - 被 `io/` 和 `commands/` 使用
//! - 子模块: volume, summary

pub mod summary;
pub mod volume;

pub use summary::IsosurfaceRecord;
pub use volume::Volume;
