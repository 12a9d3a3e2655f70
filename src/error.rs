//! # 统一错误处理模块
//!
//! 定义 cdiutils 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// cdiutils 统一错误类型
#[derive(Error, Debug)]
pub enum CdiError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 数据格式错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse npy data in {path}\nReason: {reason}")]
    NpyError { path: String, reason: String },

    #[error("Array '{key}' not found in {path}")]
    ArrayNotFound { key: String, path: String },

    #[error("Unsupported array dtype: {0}")]
    UnsupportedDtype(String),

    #[error("Expected a 3D volume, got shape {0:?}")]
    NotAVolume(Vec<u64>),

    // ─────────────────────────────────────────────────────────────
    // 数值 / 形状错误
    // ─────────────────────────────────────────────────────────────
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Cannot normalize data with zero range (constant value {0})")]
    ZeroRange(f64),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 输出错误
    // ─────────────────────────────────────────────────────────────
    #[error("Plotting failed: {0}")]
    PlotError(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, CdiError>;
