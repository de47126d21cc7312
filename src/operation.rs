//! # 单文件操作接口
//!
//! 批处理引擎调用的外部协作者：对一个输入文件生成一个输出文件。
//!
//! ## 约定
//! - 返回 `Ok(true)` 表示 `output` 已完整写入
//! - 返回 `Ok(false)` 或 `Err` 表示失败，引擎会丢弃临时输出
//! - 操作内部的 panic 同样被视为失败
//!
//! ## 依赖关系
//! - 被 `batch/` 调用
//! - 由 `gimp/operations.rs` 实现

use crate::models::Parameters;

use std::path::Path;

/// 单文件操作的返回类型
pub type OperationResult = anyhow::Result<bool>;

/// 单文件操作
pub trait FileOperation: Send + Sync {
    /// 处理单个文件，结果写入 `output`
    fn process(&self, input: &Path, output: &Path, parameters: &Parameters) -> OperationResult;

    /// 输出文件扩展名；`None` 表示保留输入扩展名
    fn output_extension(&self) -> Option<&str> {
        None
    }

    /// 操作名称（用于日志）
    fn name(&self) -> &str {
        "operation"
    }
}

impl<F> FileOperation for F
where
    F: Fn(&Path, &Path, &Parameters) -> OperationResult + Send + Sync,
{
    fn process(&self, input: &Path, output: &Path, parameters: &Parameters) -> OperationResult {
        self(input, output, parameters)
    }
}
