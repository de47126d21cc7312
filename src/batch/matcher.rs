//! # 文件匹配器
//!
//! 根据输入目录和 glob 模式解析出待处理的图像文件列表。
//!
//! ## 功能
//! - glob 模式匹配（`*`, `*.jpg`, `image_*`）
//! - 只保留受支持的图像扩展名，扩展名大小写不敏感
//! - 去重并按绝对路径字典序排序，保证结果可复现
//!
//! ## 依赖关系
//! - 被 `batch/coordinator.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use crate::error::{GimpBatchError, Result};

use glob::{MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 支持的图像格式扩展名（小写）
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "tif", "tiff", "bmp", "gif", "webp", "xcf",
];

/// 检查扩展名是否受支持（大小写不敏感）
pub fn is_supported_extension(ext: &str) -> bool {
    let ext = ext.trim_start_matches('.').to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.contains(&ext.as_str())
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// 文件匹配器
pub struct FileMatcher {
    /// 输入目录
    directory: PathBuf,
    /// 匹配模式
    pattern: String,
}

impl FileMatcher {
    /// 创建新的文件匹配器，默认匹配所有受支持文件
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            pattern: "*".to_string(),
        }
    }

    /// 设置匹配模式
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = pattern.trim().to_string();
        self
    }

    /// 收集所有匹配的文件（绝对路径，已排序去重）
    ///
    /// 没有任何匹配时返回空列表而不是错误。
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        let root = resolve_directory(&self.directory)?;
        let pattern = compile_pattern(&self.pattern)?;

        let files: BTreeSet<PathBuf> = WalkDir::new(&root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| Self::matches(&pattern, e.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        Ok(files.into_iter().collect())
    }

    /// 检查单个文件是否匹配
    ///
    /// 扩展名必须受支持；模式可以匹配完整文件名（扩展名按小写比较），
    /// 也可以只匹配文件主干（如 `photo` 匹配 `photo.JPG`）。
    fn matches(pattern: &Pattern, path: &Path) -> bool {
        let (stem, ext) = match (
            path.file_stem().and_then(|s| s.to_str()),
            path.extension().and_then(|s| s.to_str()),
        ) {
            (Some(stem), Some(ext)) => (stem, ext.to_ascii_lowercase()),
            _ => return false,
        };

        if !is_supported_extension(&ext) {
            return false;
        }

        let normalized = format!("{}.{}", stem, ext);
        [normalized.as_str(), stem]
            .iter()
            .any(|candidate| pattern.matches_with(candidate, MATCH_OPTIONS))
    }
}

/// 解析目录为绝对路径
fn resolve_directory(directory: &Path) -> Result<PathBuf> {
    fs::canonicalize(directory).map_err(|e| match e.kind() {
        ErrorKind::NotFound => GimpBatchError::DirectoryNotFound {
            path: directory.display().to_string(),
        },
        _ => GimpBatchError::DirectoryReadError {
            path: directory.display().to_string(),
            source: e,
        },
    })
}

/// 编译模式
///
/// 最后一个 `.` 之后的部分能匹配某个受支持扩展名时（如 `JPG`, `jp*g`）才转为小写，
/// 否则保持原样（如 `IMG.Final*` 中的 `Final*` 属于文件主干）。
fn compile_pattern(pattern: &str) -> Result<Pattern> {
    if pattern.is_empty() {
        return Err(GimpBatchError::EmptyPattern);
    }

    let normalized = match pattern.rfind('.') {
        Some(idx) if is_extension_pattern(&pattern[idx + 1..]) => {
            format!("{}{}", &pattern[..idx], pattern[idx..].to_ascii_lowercase())
        }
        _ => pattern.to_string(),
    };

    Pattern::new(&normalized).map_err(|e| GimpBatchError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

fn is_extension_pattern(tail: &str) -> bool {
    Pattern::new(&tail.to_ascii_lowercase())
        .map(|p| SUPPORTED_EXTENSIONS.iter().any(|ext| p.matches(ext)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"data").unwrap();
        }
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_supported_extension() {
        assert!(is_supported_extension("png"));
        assert!(is_supported_extension("JPEG"));
        assert!(is_supported_extension(".Tif"));
        assert!(!is_supported_extension("txt"));
        assert!(!is_supported_extension("psd"));
    }

    #[test]
    fn test_star_matches_supported_only() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), &["c.png", "a.JPG", "b.webp", "notes.txt", "README"]);

        let files = FileMatcher::new(dir.path()).collect().unwrap();
        assert_eq!(names(&files), vec!["a.JPG", "b.webp", "c.png"]);
        assert!(files.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_extension_case_insensitive() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), &["one.jpg", "two.JPG", "three.Jpg", "four.png"]);

        let files = FileMatcher::new(dir.path())
            .with_pattern("*.JPG")
            .collect()
            .unwrap();
        assert_eq!(names(&files), vec!["one.jpg", "three.Jpg", "two.JPG"]);
    }

    #[test]
    fn test_pattern_matches_stem() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), &["photo.png", "photo.TIFF", "photos.png", "image_1.gif"]);

        let files = FileMatcher::new(dir.path())
            .with_pattern("photo")
            .collect()
            .unwrap();
        assert_eq!(names(&files), vec!["photo.TIFF", "photo.png"]);

        let files = FileMatcher::new(dir.path())
            .with_pattern("image_*")
            .collect()
            .unwrap();
        assert_eq!(names(&files), vec!["image_1.gif"]);
    }

    #[test]
    fn test_dotted_stem_keeps_case() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), &["IMG.Final_1.png", "IMG.final_2.png", "IMG.Final_3.JPG"]);

        let files = FileMatcher::new(dir.path())
            .with_pattern("IMG.Final*")
            .collect()
            .unwrap();
        assert_eq!(names(&files), vec!["IMG.Final_1.png", "IMG.Final_3.JPG"]);

        let files = FileMatcher::new(dir.path())
            .with_pattern("IMG.Final_*.PNG")
            .collect()
            .unwrap();
        assert_eq!(names(&files), vec!["IMG.Final_1.png"]);
    }

    #[test]
    fn test_extension_glob_detection() {
        assert!(is_extension_pattern("JPG"));
        assert!(is_extension_pattern("jp*g"));
        assert!(is_extension_pattern("*"));
        assert!(!is_extension_pattern("Final*"));
        assert!(!is_extension_pattern("txt"));
    }

    #[test]
    fn test_skips_hidden_and_subdirectories() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), &["a.png", ".a.tmp123.png"]);
        fs::create_dir(dir.path().join("nested.png")).unwrap();
        touch(&dir.path().join("nested.png"), &["deep.png"]);

        let files = FileMatcher::new(dir.path()).collect().unwrap();
        assert_eq!(names(&files), vec!["a.png"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), &["a.png"]);

        let files = FileMatcher::new(dir.path())
            .with_pattern("*.bmp")
            .collect()
            .unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_deterministic_order() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), &["z.png", "m.jpg", "a.gif", "k.xcf"]);

        let matcher = FileMatcher::new(dir.path()).with_pattern("*");
        let first = matcher.collect().unwrap();
        let second = matcher.collect().unwrap();
        assert_eq!(first, second);

        let mut sorted = first.clone();
        sorted.sort();
        assert_eq!(first, sorted);
    }

    #[test]
    fn test_invalid_and_empty_pattern() {
        let dir = TempDir::new().unwrap();

        let result = FileMatcher::new(dir.path()).with_pattern("[").collect();
        assert!(matches!(result, Err(GimpBatchError::InvalidPattern { .. })));

        let result = FileMatcher::new(dir.path()).with_pattern("  ").collect();
        assert!(matches!(result, Err(GimpBatchError::EmptyPattern)));
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = FileMatcher::new(dir.path().join("missing")).collect();
        assert!(matches!(result, Err(GimpBatchError::DirectoryNotFound { .. })));
    }
}
