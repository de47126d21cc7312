//! # 工作线程池
//!
//! 以有限并行度执行所有单文件任务，按完成顺序收集结果。
//!
//! ## 功能
//! - 基于 rayon 的固定大小线程池
//! - 每个任务经 `AtomicFileWriter` 包装
//! - 任务边界捕获 panic，单个任务失败不影响其他任务
//! - 进度条显示
//!
//! ## 依赖关系
//! - 被 `batch/coordinator.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use super::atomic::{panic_message, AtomicFileWriter};
use crate::error::{GimpBatchError, Result};
use crate::models::{FileOutcome, FileTask};
use crate::operation::FileOperation;
use crate::utils::progress;

use indicatif::ProgressBar;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;

/// 工作线程池
pub struct WorkerPool {
    /// rayon 线程池
    pool: rayon::ThreadPool,
    /// 并行作业数
    max_workers: usize,
    /// 是否显示进度条
    show_progress: bool,
}

impl WorkerPool {
    /// 创建新的线程池，并行数至少为 1
    pub fn new(max_workers: usize) -> Result<Self> {
        let max_workers = max_workers.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(max_workers)
            .thread_name(|i| format!("gimp-batch-worker-{}", i))
            .build()
            .map_err(|e| GimpBatchError::WorkerPool(e.to_string()))?;

        Ok(Self {
            pool,
            max_workers,
            show_progress: false,
        })
    }

    /// 设置是否显示进度条
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// 并行数
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// 执行所有任务
    ///
    /// 每个任务恰好产生一个 `FileOutcome`，返回顺序为完成顺序。
    pub fn execute(&self, tasks: &[FileTask], operation: &dyn FileOperation) -> Vec<FileOutcome> {
        let pb = if self.show_progress {
            progress::create_progress_bar(tasks.len() as u64, operation.name())
        } else {
            ProgressBar::hidden()
        };

        let (tx, rx) = mpsc::channel();

        self.pool.scope(|scope| {
            for task in tasks {
                let tx = tx.clone();
                let pb = &pb;
                scope.spawn(move |_| {
                    let outcome = run_isolated(task, operation);
                    if let Some(error) = &outcome.error {
                        // 日志与进度条共用 stderr
                        pb.suspend(|| {
                            tracing::warn!(
                                input = %outcome.input_path.display(),
                                error = %error,
                                "file failed"
                            )
                        });
                    }
                    pb.inc(1);
                    // 接收端在 scope 结束前一直存活
                    let _ = tx.send(outcome);
                });
            }
        });
        drop(tx);

        let outcomes: Vec<FileOutcome> = rx.into_iter().collect();
        pb.finish_and_clear();

        outcomes
    }
}

/// 在任务边界执行单个任务，任何 panic 都转换为失败结果
fn run_isolated(task: &FileTask, operation: &dyn FileOperation) -> FileOutcome {
    panic::catch_unwind(AssertUnwindSafe(|| AtomicFileWriter::run(task, operation)))
        .unwrap_or_else(|payload| {
            let message = format!("worker panicked: {}", panic_message(payload.as_ref()));
            FileOutcome::failure(task.input_path.clone(), task.output_path.clone(), message)
        })
}
