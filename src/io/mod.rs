//! # 数据读写模块
//!
//! ## 子模块
//! - `npy`: `.npy` / `.npz` 体数据读写
//! - `export`: 分析结果 CSV 导出
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/` 数据模型

pub mod export;
pub mod npy;

pub use npy::{load_real_volume, load_volume, save_npy};
