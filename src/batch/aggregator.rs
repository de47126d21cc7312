//! # 结果汇总
//!
//! 将单文件处理结果累积为批处理汇总。
//!
//! ## 依赖关系
//! - 被 `batch/coordinator.rs` 调用
//! - 产出 `models::BatchResult`

use crate::models::{BatchResult, FailedFile, FileOutcome};

/// 结果汇总器
#[derive(Debug, Default)]
pub struct ResultAggregator {
    result: BatchResult,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 合并单个处理结果
    pub fn merge(&mut self, outcome: FileOutcome) {
        self.result.total_files += 1;
        if outcome.succeeded {
            self.result.succeeded += 1;
        } else {
            self.result.failed += 1;
            self.result.failed_files.push(FailedFile {
                path: outcome.input_path,
                error: outcome
                    .error
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }
    }

    /// 完成汇总并计算成功率
    pub fn finish(mut self) -> BatchResult {
        self.result.success_rate = if self.result.total_files == 0 {
            0.0
        } else {
            self.result.succeeded as f64 / self.result.total_files as f64
        };
        self.result
    }

    /// 一次性汇总所有结果
    pub fn aggregate(outcomes: impl IntoIterator<Item = FileOutcome>) -> BatchResult {
        let mut aggregator = Self::new();
        for outcome in outcomes {
            aggregator.merge(outcome);
        }
        aggregator.finish()
    }
}
