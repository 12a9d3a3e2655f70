//! # 文件收集器
//!
//! 根据输入路径和模式收集待处理的体数据文件。
//!
//! ## 功能
//! - 支持单文件和目录输入
//! - glob 模式匹配（逗号分隔的多模式）
//! - 递归目录搜索
//!
//! ## 依赖关系
//! - 被 `commands/isosurface.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use crate::error::{CdiError, Result};

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 默认匹配模式
pub const DEFAULT_PATTERN: &str = "*.npy,*.npz";

/// 文件收集器
pub struct FileCollector {
    /// 输入路径
    input: PathBuf,
    /// 匹配模式列表
    patterns: Vec<Pattern>,
    /// 是否递归
    recursive: bool,
}

impl FileCollector {
    /// 创建新的文件收集器，匹配 `.npy` 与 `.npz`
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            patterns: parse_patterns(DEFAULT_PATTERN).unwrap_or_default(),
            recursive: false,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        let patterns = parse_patterns(pattern)?;
        if !patterns.is_empty() {
            self.patterns = patterns;
        }
        Ok(self)
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有匹配的文件（按路径排序）
    pub fn collect(&self) -> Vec<PathBuf> {
        if self.input.is_file() {
            return vec![self.input.clone()];
        }

        if !self.input.is_dir() {
            return vec![];
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|entry| self.matches_patterns(entry.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        files
    }

    /// 检查文件名是否匹配任一模式
    fn matches_patterns(&self, path: &Path) -> bool {
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => self.patterns.iter().any(|p| p.matches(name)),
            None => false,
        }
    }
}

fn parse_patterns(input: &str) -> Result<Vec<Pattern>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Pattern::new(s).map_err(|e| {
                CdiError::InvalidArgument(format!("invalid pattern '{}': {}", s, e))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_collect_default_patterns() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.npz"), b"").unwrap();
        fs::write(dir.path().join("a.npy"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.npy"), b"").unwrap();

        let files = FileCollector::new(dir.path().to_path_buf()).collect();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.npy", "b.npz"]);

        let all = FileCollector::new(dir.path().to_path_buf())
            .recursive(true)
            .collect();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_custom_pattern() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("amp_run1.npy"), b"").unwrap();
        fs::write(dir.path().join("support.npy"), b"").unwrap();

        let files = FileCollector::new(dir.path().to_path_buf())
            .with_pattern("amp_*.npy")
            .unwrap()
            .collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("amp_run1.npy"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(FileCollector::new(PathBuf::from("."))
            .with_pattern("[a-")
            .is_err());
    }

    #[test]
    fn test_single_file_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("obj.npz");
        fs::write(&path, b"").unwrap();

        let collector = FileCollector::new(path.clone());
        assert_eq!(collector.collect(), vec![path]);
    }
}
