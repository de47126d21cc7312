//! # 处理结果数据模型
//!
//! 单文件处理结果与批处理汇总结果。
//!
//! ## 依赖关系
//! - `FileOutcome` 由 `batch/atomic.rs` 产生
//! - `BatchResult` 由 `batch/aggregator.rs` 产生，可直接序列化为 JSON

use serde::Serialize;
use std::path::PathBuf;

/// 单文件处理结果
///
/// 每个 `FileTask` 恰好产生一个。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub succeeded: bool,
    pub error: Option<String>,
}

impl FileOutcome {
    /// 成功结果
    pub fn success(input_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            input_path,
            output_path,
            succeeded: true,
            error: None,
        }
    }

    /// 失败结果
    pub fn failure(input_path: PathBuf, output_path: PathBuf, error: impl Into<String>) -> Self {
        Self {
            input_path,
            output_path,
            succeeded: false,
            error: Some(error.into()),
        }
    }
}

/// 失败文件详情
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: String,
}

/// 批处理整体状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    CompleteSuccess,
    PartialSuccess,
    TotalFailure,
}

/// 批处理汇总结果
///
/// 满足 `succeeded + failed == total_files`，`success_rate` 在 `[0, 1]` 内。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchResult {
    /// 文件总数
    pub total_files: usize,
    /// 成功数量
    pub succeeded: usize,
    /// 失败数量
    pub failed: usize,
    /// 失败详情（按观察到的顺序）
    pub failed_files: Vec<FailedFile>,
    /// 成功率
    pub success_rate: f64,
}

impl BatchResult {
    /// 是否全部成功
    pub fn is_complete_success(&self) -> bool {
        self.total_files > 0 && self.failed == 0
    }

    /// 是否部分成功
    pub fn is_partial_success(&self) -> bool {
        self.succeeded > 0 && self.failed > 0
    }

    /// 整体状态；没有任何成功文件时视为完全失败
    pub fn status(&self) -> BatchStatus {
        if self.is_complete_success() {
            BatchStatus::CompleteSuccess
        } else if self.is_partial_success() {
            BatchStatus::PartialSuccess
        } else {
            BatchStatus::TotalFailure
        }
    }
}
