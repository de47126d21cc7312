//! # 原子写入
//!
//! 包装单文件操作：先写入与目标同目录的临时文件，操作成功后再通过
//! rename 原子地替换目标文件。
//!
//! ## 功能
//! - 临时文件与目标位于同一目录（同一文件系统），rename 才是原子的
//! - 临时文件名带随机后缀，并发任务之间不会冲突
//! - 操作失败、返回错误或 panic 时删除临时文件，目标文件保持不变
//!
//! ## 依赖关系
//! - 被 `batch/pool.rs` 调用
//! - 使用 `tempfile` 创建临时文件

use crate::models::{FileOutcome, FileTask};
use crate::operation::FileOperation;

use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tempfile::TempPath;

/// 原子写入器
pub struct AtomicFileWriter;

impl AtomicFileWriter {
    /// 执行单个任务，总是返回一个 `FileOutcome`
    pub fn run(task: &FileTask, operation: &dyn FileOperation) -> FileOutcome {
        match Self::try_run(task, operation) {
            Ok(()) => {
                tracing::debug!(
                    input = %task.input_path.display(),
                    output = %task.output_path.display(),
                    "file processed"
                );
                FileOutcome::success(task.input_path.clone(), task.output_path.clone())
            }
            Err(error) => {
                tracing::debug!(
                    input = %task.input_path.display(),
                    error = %error,
                    "operation failed"
                );
                FileOutcome::failure(task.input_path.clone(), task.output_path.clone(), error)
            }
        }
    }

    fn try_run(task: &FileTask, operation: &dyn FileOperation) -> Result<(), String> {
        let parent = match task.output_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        fs::create_dir_all(parent)
            .map_err(|e| format!("cannot create directory {}: {}", parent.display(), e))?;

        let temp = create_temp_path(&task.output_path, parent)?;

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            operation.process(&task.input_path, &temp, &task.parameters)
        }));

        match result {
            Ok(Ok(true)) => temp.persist(&task.output_path).map_err(|e| {
                let message = format!(
                    "cannot move result to {}: {}",
                    task.output_path.display(),
                    e.error
                );
                discard(e.path);
                message
            }),
            Ok(Ok(false)) => {
                discard(temp);
                Err(format!("{} reported failure", operation.name()))
            }
            Ok(Err(e)) => {
                discard(temp);
                Err(format!("{:#}", e))
            }
            Err(payload) => {
                discard(temp);
                Err(format!("{} panicked: {}", operation.name(), panic_message(payload.as_ref())))
            }
        }
    }
}

/// 在目标目录中创建临时文件，保留目标扩展名以便外部程序识别格式
fn create_temp_path(output_path: &Path, dir: &Path) -> Result<TempPath, String> {
    let stem = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    let suffix = output_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    tempfile::Builder::new()
        .prefix(&format!(".{}.", stem))
        .suffix(&suffix)
        .rand_bytes(8)
        .tempfile_in(dir)
        .map(|file| file.into_temp_path())
        .map_err(|e| format!("cannot create temporary file in {}: {}", dir.display(), e))
}

/// 删除临时文件，失败只记录日志
fn discard(temp: TempPath) {
    let path = temp.to_path_buf();
    if let Err(e) = temp.close() {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove temporary file");
    }
}

/// 提取 panic 信息
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
