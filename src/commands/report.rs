//! # 批处理报告
//!
//! 将 `BatchResult` 输出为终端摘要、失败表格或 JSON。
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 使用
//! - 使用 `tabled` 显示失败文件表格
//! - 使用 `utils/output.rs`

use crate::error::Result;
use crate::models::{BatchResult, BatchStatus, FailedFile};
use crate::utils::output;

use tabled::{Table, Tabled};

/// 失败表格中单条错误的最大显示长度
const MAX_ERROR_WIDTH: usize = 80;

#[derive(Debug, Clone, Tabled)]
struct FailureRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Error")]
    error: String,
}

fn rows(failed: &[FailedFile]) -> Vec<FailureRow> {
    failed
        .iter()
        .enumerate()
        .map(|(i, f)| FailureRow {
            index: i + 1,
            file: f
                .path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| f.path.display().to_string()),
            error: shorten(f.error.lines().next().unwrap_or_default(), MAX_ERROR_WIDTH),
        })
        .collect()
}

fn status_label(status: BatchStatus) -> &'static str {
    match status {
        BatchStatus::CompleteSuccess => "complete success",
        BatchStatus::PartialSuccess => "partial success",
        BatchStatus::TotalFailure => "total failure",
    }
}

fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max.saturating_sub(1)).collect();
    short.push('…');
    short
}

/// 终端摘要；`verbose` 时逐个打印完整错误
pub fn print_summary(result: &BatchResult, verbose: bool) {
    output::print_header("Batch Summary");
    println!("  Total:     {}", result.total_files);
    println!("  Succeeded: {}", result.succeeded);
    println!("  Failed:    {}", result.failed);
    println!("  Success:   {}", output::colored_rate(result.success_rate));
    println!("  Status:    {}\n", status_label(result.status()));

    if result.failed_files.is_empty() {
        output::print_success(&format!("All {} files processed", result.total_files));
        return;
    }

    if verbose {
        for failed in &result.failed_files {
            output::print_failed_file(&failed.path, &failed.error);
        }
    } else {
        println!("{}", Table::new(rows(&result.failed_files)));
    }

    output::print_warning(&format!(
        "{} of {} files failed",
        result.failed, result.total_files
    ));
}

/// 静默模式只报告失败文件
pub fn print_failures_only(result: &BatchResult) {
    for failed in &result.failed_files {
        output::print_error(&format!(
            "{}: {}",
            failed.path.display(),
            failed.error.lines().next().unwrap_or_default()
        ));
    }
}

/// 以 JSON 输出完整结果
pub fn print_json(result: &BatchResult) -> Result<()> {
    println!("{}", to_json(result)?);
    Ok(())
}

fn to_json(result: &BatchResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}
