//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 功能
//! 批处理子命令共享同一流程：
//! 参数校验 → 检测 GIMP → 构造请求 → `BatchCoordinator::run` → 输出报告
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `gimp/`, `config.rs`, `utils/`
//! - 子模块: resize, convert, filter, detect, report

pub mod convert;
pub mod detect;
pub mod filter;
pub mod report;
pub mod resize;

use crate::batch::BatchCoordinator;
use crate::cli::batch::BatchArgs;
use crate::cli::{Cli, Commands, GlobalArgs};
use crate::config::Config;
use crate::error::{GimpBatchError, Result};
use crate::gimp::{detect_gimp, GimpCli};
use crate::models::{BatchRequest, Parameters};
use crate::operation::FileOperation;
use crate::utils::output;

use std::time::Duration;

/// 命令结束状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// 所有文件处理成功
    Success,
    /// 批处理完成，但至少一个文件失败
    PartialFailure,
}

impl RunStatus {
    /// 进程退出码：部分失败为 2（批次级错误由调用方映射为 1）
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Success => 0,
            RunStatus::PartialFailure => 2,
        }
    }
}

/// 执行命令
pub fn run(cli: Cli, config: &Config) -> Result<RunStatus> {
    let global = &cli.global;
    match cli.command {
        Commands::Resize(args) => resize::execute(args, global, config),
        Commands::Convert(args) => convert::execute(args, global, config),
        Commands::Filter(args) => filter::execute(args, global, config),
        Commands::Detect { gimp } => detect::execute(gimp.as_deref(), global, config),
    }
}

/// 根据命令行与配置构造 GIMP 调用器
fn gimp_cli(batch: &BatchArgs, config: &Config) -> Result<GimpCli> {
    let explicit = batch.gimp.as_deref().or(config.gimp_executable.as_deref());
    let executable = detect_gimp(explicit)?;

    let timeout = batch.timeout.unwrap_or(config.process_timeout_secs);
    if timeout == 0 {
        return Err(GimpBatchError::InvalidArgument(
            "timeout must be at least 1 second".to_string(),
        ));
    }

    tracing::info!(gimp = %executable.display(), timeout_secs = timeout, "using GIMP");
    Ok(GimpCli::new(executable, Duration::from_secs(timeout)))
}

/// 运行一次批处理并输出报告
fn run_batch(
    global: &GlobalArgs,
    batch: &BatchArgs,
    config: &Config,
    operation: &dyn FileOperation,
    parameters: Parameters,
) -> Result<RunStatus> {
    let workers = batch.jobs.unwrap_or(config.max_workers);
    let cpus = num_cpus::get();
    if workers > cpus {
        tracing::warn!(workers, cpus, "more GIMP workers than CPU cores");
    }
    let request = BatchRequest::new(batch.input.clone(), batch.output.clone())
        .with_pattern(&batch.pattern)
        .with_max_workers(workers)
        .with_parameters(parameters);

    let interactive = !global.quiet && !global.json;
    if interactive {
        output::print_header(&format!("Batch {}", operation.name()));
        output::print_info(&format!(
            "'{}' → '{}' (pattern '{}', {} workers)",
            request.input_directory.display(),
            request.output_directory.display(),
            request.file_pattern,
            request.max_workers.max(1)
        ));
    }

    let mut coordinator = BatchCoordinator::new(operation).with_progress(interactive);
    let result = coordinator.run(&request)?;

    if global.json {
        report::print_json(&result)?;
    } else if global.quiet {
        report::print_failures_only(&result);
    } else {
        report::print_summary(&result, global.verbose);
    }

    Ok(if result.is_complete_success() {
        RunStatus::Success
    } else {
        RunStatus::PartialFailure
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(RunStatus::Success.exit_code(), 0);
        assert_eq!(RunStatus::PartialFailure.exit_code(), 2);
    }
}
