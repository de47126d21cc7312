//! # GIMP 可执行文件检测
//!
//! 优先使用显式指定的路径，否则在 PATH 中查找。
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `which` 搜索 PATH

use crate::error::{GimpBatchError, Result};

use std::path::{Path, PathBuf};

/// 按优先级排列的候选程序名（console 版本无需图形界面）
pub const GIMP_CANDIDATES: &[&str] = &["gimp-console-2.10", "gimp-console", "gimp-2.10", "gimp"];

/// 检测 GIMP 可执行文件
pub fn detect_gimp(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        // 可能是 PATH 中的程序名
        return which::which(path).map_err(|_| GimpBatchError::GimpNotFound {
            searched: path.display().to_string(),
        });
    }

    GIMP_CANDIDATES
        .iter()
        .find_map(|name| which::which(name).ok())
        .ok_or_else(|| GimpBatchError::GimpNotFound {
            searched: GIMP_CANDIDATES.join(", "),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_existing_path() {
        let dir = TempDir::new().unwrap();
        let exe = dir.path().join("gimp-console");
        fs::write(&exe, b"").unwrap();

        assert_eq!(detect_gimp(Some(&exe)).unwrap(), exe);
    }

    #[test]
    fn test_explicit_missing_path() {
        let dir = TempDir::new().unwrap();
        let result = detect_gimp(Some(&dir.path().join("no-such-gimp")));
        assert!(matches!(result, Err(GimpBatchError::GimpNotFound { .. })));
    }
}
