//! # 统一错误处理模块
//!
//! 定义 gimp-batch 的所有错误类型，使用 `thiserror` 派生。
//!
//! 这里只包含批次级（pre-flight）错误。单个文件的处理失败不会以错误形式
//! 抛出，而是记录在 `FileOutcome.error` 中。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// gimp-batch 统一错误类型
#[derive(Error, Debug)]
pub enum GimpBatchError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read directory: {path}")]
    DirectoryReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Cannot create output directory: {path}")]
    OutputDirCreateError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Output directory is not writable: {path}")]
    OutputDirNotWritable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 匹配错误
    // ─────────────────────────────────────────────────────────────
    #[error("File pattern must not be empty")]
    EmptyPattern,

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("No supported image files matched '{pattern}' in {directory}")]
    NoFilesFound { directory: String, pattern: String },

    // ─────────────────────────────────────────────────────────────
    // 执行错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("GIMP executable not found (searched: {searched})")]
    GimpNotFound { searched: String },

    #[error("External command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("External command '{command}' timed out after {seconds}s")]
    CommandTimeout { command: String, seconds: u64 },

    #[error("Failed to spawn '{command}'")]
    CommandSpawnError {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数与配置错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid config file {path}: {reason}")]
    ConfigError { path: String, reason: String },

    #[error("Failed to serialize batch result")]
    Serialization(#[from] serde_json::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, GimpBatchError>;
