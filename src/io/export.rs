//! # 结果导出
//!
//! 将批量分析结果导出为 CSV。
//!
//! ## 依赖关系
//! - 被 `commands/isosurface.rs` 调用
//! - 使用 `csv` + `serde` 序列化 `models/summary.rs` 的记录

use crate::error::{CdiError, Result};
use crate::models::IsosurfaceRecord;

use std::path::Path;

/// 导出等值面汇总为 CSV（按文件名排序）
pub fn isosurface_records_to_csv(records: &[IsosurfaceRecord], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    let mut sorted: Vec<&IsosurfaceRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.file.cmp(&b.file));

    for record in sorted {
        wtr.serialize(record)?;
    }

    wtr.flush().map_err(|e| CdiError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(file: &str, isosurface: f64) -> IsosurfaceRecord {
        IsosurfaceRecord {
            file: file.to_string(),
            isosurface,
            peak: 0.7,
            fwhm: 0.1,
            sigma: 0.06,
            background: 0.05,
            voxels: 1000,
        }
    }

    #[test]
    fn test_records_to_csv_sorted_with_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.csv");

        let records = vec![record("run_b.npz", 0.4), record("run_a.npz", 0.5)];
        isosurface_records_to_csv(&records, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(
            lines[0],
            "file,isosurface,peak,fwhm,sigma,background,voxels"
        );
        assert!(lines[1].starts_with("run_a.npz,0.5,"));
        assert!(lines[2].starts_with("run_b.npz,0.4,"));
    }
}
