//! # 批量处理模块
//!
//! 对目录中匹配的图像文件逐个应用同一操作，并汇总结果。
//!
//! ## 功能
//! - 匹配输入文件（扩展名白名单，大小写不敏感）
//! - 原子写入：失败时不留下半成品文件
//! - 有限并行度执行，单文件失败相互隔离
//! - 成功/失败统计与成功率
//!
//! ## 数据流
//! ```text
//! BatchRequest ─> BatchCoordinator ─> FileMatcher
//!                        │
//!                        ├─> WorkerPool ─> AtomicFileWriter ─> FileOperation
//!                        │
//!                        └─> ResultAggregator ─> BatchResult
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod aggregator;
pub mod atomic;
pub mod coordinator;
pub mod matcher;
pub mod pool;

pub use aggregator::ResultAggregator;
pub use atomic::AtomicFileWriter;
pub use coordinator::{BatchCoordinator, BatchState};
pub use matcher::{is_supported_extension, FileMatcher, SUPPORTED_EXTENSIONS};
pub use pool::WorkerPool;
