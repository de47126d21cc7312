//! # GIMP 集成模块
//!
//! 通过 GIMP 批处理模式（Script-Fu）实现具体的单文件操作。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 实现 `operation::FileOperation`
//! - 子模块: detect, cli, script, operations

pub mod cli;
pub mod detect;
pub mod operations;
pub mod script;

pub use cli::GimpCli;
pub use detect::detect_gimp;
pub use operations::{ConvertOperation, FilterOperation, ResizeOperation};
