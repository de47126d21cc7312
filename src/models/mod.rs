//! # 数据模型模块
//!
//! 定义批处理请求、单文件任务与处理结果的数据模型。
//!
//! ## 依赖关系
//! - 被 `batch/` 和 `commands/` 使用
//! - 子模块: request, outcome

pub mod outcome;
pub mod request;

pub use outcome::{BatchResult, BatchStatus, FailedFile, FileOutcome};
pub use request::{BatchRequest, FileTask, Parameters};
