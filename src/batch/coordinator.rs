//! # 批处理协调器
//!
//! 串联匹配、分发、汇总三个阶段，完成一次批处理。
//!
//! ## 状态机
//! ```text
//! Validating ──> Dispatching ──> Aggregating ──> Done
//!     │
//!     └──> Failed   (输入目录无效 / 无匹配文件 / 输出目录不可写 / 线程池创建失败)
//! ```
//!
//! `Failed` 只能从 `Validating` 进入：一旦开始分发，批处理一定运行到底，
//! 单个文件的失败只体现在 `BatchResult` 中。
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `batch/matcher.rs`, `batch/pool.rs`, `batch/aggregator.rs`

use super::aggregator::ResultAggregator;
use super::matcher::FileMatcher;
use super::pool::WorkerPool;
use crate::error::{GimpBatchError, Result};
use crate::models::{BatchRequest, BatchResult, FileOutcome, FileTask};
use crate::operation::FileOperation;

use std::collections::HashSet;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// 批处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Validating,
    Dispatching,
    Aggregating,
    Done,
    Failed,
}

impl std::fmt::Display for BatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchState::Validating => write!(f, "validating"),
            BatchState::Dispatching => write!(f, "dispatching"),
            BatchState::Aggregating => write!(f, "aggregating"),
            BatchState::Done => write!(f, "done"),
            BatchState::Failed => write!(f, "failed"),
        }
    }
}

/// 批处理协调器
pub struct BatchCoordinator<'a> {
    /// 单文件操作
    operation: &'a dyn FileOperation,
    /// 是否显示进度条
    show_progress: bool,
    /// 当前状态
    state: BatchState,
}

impl<'a> BatchCoordinator<'a> {
    /// 创建新的批处理协调器
    pub fn new(operation: &'a dyn FileOperation) -> Self {
        Self {
            operation,
            show_progress: false,
            state: BatchState::Validating,
        }
    }

    /// 设置是否显示进度条
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// 当前状态
    pub fn state(&self) -> BatchState {
        self.state
    }

    /// 执行批处理
    ///
    /// 校验失败返回 `Err`，此时不会启动任何任务；
    /// 校验通过后总是返回 `Ok(BatchResult)`，即使全部文件都失败。
    pub fn run(&mut self, request: &BatchRequest) -> Result<BatchResult> {
        self.transition(BatchState::Validating);

        let (files, output_dir, pool) = match self.validate(request) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(error = %e, "batch rejected before dispatch");
                self.transition(BatchState::Failed);
                return Err(e);
            }
        };

        self.transition(BatchState::Dispatching);
        tracing::info!(
            operation = self.operation.name(),
            files = files.len(),
            workers = request.max_workers.max(1),
            output = %output_dir.display(),
            "dispatching batch"
        );

        let (tasks, collisions) = self.build_tasks(&files, &output_dir, request);
        let outcomes = pool.execute(&tasks, self.operation);

        self.transition(BatchState::Aggregating);
        let result = ResultAggregator::aggregate(outcomes.into_iter().chain(collisions));

        self.transition(BatchState::Done);
        tracing::info!(
            total = result.total_files,
            succeeded = result.succeeded,
            failed = result.failed,
            "batch finished"
        );

        Ok(result)
    }

    fn transition(&mut self, next: BatchState) {
        tracing::debug!(from = %self.state, to = %next, "batch state");
        self.state = next;
    }

    /// 校验输入、准备输出目录并创建线程池
    fn validate(&self, request: &BatchRequest) -> Result<(Vec<PathBuf>, PathBuf, WorkerPool)> {
        if request.file_pattern.trim().is_empty() {
            return Err(GimpBatchError::EmptyPattern);
        }

        check_input_directory(&request.input_directory)?;

        let files = FileMatcher::new(&request.input_directory)
            .with_pattern(&request.file_pattern)
            .collect()?;

        if files.is_empty() {
            return Err(GimpBatchError::NoFilesFound {
                directory: request.input_directory.display().to_string(),
                pattern: request.file_pattern.clone(),
            });
        }

        let output_dir = prepare_output_directory(&request.output_directory)?;
        let pool = WorkerPool::new(request.max_workers)?.with_progress(self.show_progress);
        Ok((files, output_dir, pool))
    }

    /// 为每个输入文件生成任务
    ///
    /// 扩展名替换可能让两个输入映射到同一输出（如 `a.png` 与 `a.jpg` 都转为 `a.webp`），
    /// 后出现的输入直接记为失败，不参与分发。
    fn build_tasks(
        &self,
        files: &[PathBuf],
        output_dir: &Path,
        request: &BatchRequest,
    ) -> (Vec<FileTask>, Vec<FileOutcome>) {
        let extension = self.operation.output_extension();
        let mut seen = HashSet::new();
        let mut tasks = Vec::with_capacity(files.len());
        let mut collisions = Vec::new();

        for file in files {
            let task =
                FileTask::for_input(file, output_dir, extension, &request.operation_parameters);
            if seen.insert(task.output_path.clone()) {
                tasks.push(task);
            } else {
                tracing::warn!(
                    input = %file.display(),
                    output = %task.output_path.display(),
                    "output path already claimed by another input"
                );
                collisions.push(FileOutcome::failure(
                    task.input_path,
                    task.output_path.clone(),
                    format!(
                        "output {} collides with another input",
                        task.output_path.display()
                    ),
                ));
            }
        }

        (tasks, collisions)
    }
}

/// 检查输入目录存在、是目录且可读
fn check_input_directory(dir: &Path) -> Result<()> {
    let metadata = fs::metadata(dir).map_err(|e| match e.kind() {
        ErrorKind::NotFound => GimpBatchError::DirectoryNotFound {
            path: dir.display().to_string(),
        },
        _ => GimpBatchError::DirectoryReadError {
            path: dir.display().to_string(),
            source: e,
        },
    })?;

    if !metadata.is_dir() {
        return Err(GimpBatchError::NotADirectory {
            path: dir.display().to_string(),
        });
    }

    fs::read_dir(dir).map_err(|e| GimpBatchError::DirectoryReadError {
        path: dir.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 创建输出目录并探测写权限（写入后删除一个标记文件）
fn prepare_output_directory(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| GimpBatchError::OutputDirCreateError {
        path: dir.display().to_string(),
        source: e,
    })?;

    let not_writable = |e: std::io::Error| GimpBatchError::OutputDirNotWritable {
        path: dir.display().to_string(),
        source: e,
    };

    let mut marker = tempfile::Builder::new()
        .prefix(".write_test")
        .tempfile_in(dir)
        .map_err(not_writable)?;
    marker.write_all(b"test").map_err(not_writable)?;
    marker.close().map_err(not_writable)?;

    fs::canonicalize(dir).map_err(|e| GimpBatchError::DirectoryReadError {
        path: dir.display().to_string(),
        source: e,
    })
}
