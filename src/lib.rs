//! # gimp-batch 库
//!
//! 批处理引擎与 GIMP 集成，供 `gimp-batch` 可执行文件使用，也可作为库嵌入。
//!
//! ## 依赖关系
//! ```text
//! lib.rs
//!   ├── batch/      (匹配、原子写入、并行调度、汇总)
//!   ├── gimp/       (GIMP 检测、Script-Fu、具体操作)
//!   ├── models/     (请求与结果数据模型)
//!   ├── operation.rs(单文件操作 trait)
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   ├── config.rs   (TOML 配置)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

pub mod batch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod gimp;
pub mod models;
pub mod operation;
pub mod utils;

pub use batch::{BatchCoordinator, BatchState};
pub use error::{GimpBatchError, Result};
pub use models::{BatchRequest, BatchResult, Parameters};
pub use operation::FileOperation;
