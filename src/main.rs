//! # gimp-batch - 基于 GIMP 的批量图像处理
//!
//! 对目录中匹配的图像并行执行 GIMP 操作，每个输出文件原子写入。
//!
//! ## 子命令
//! - `resize`  - 批量缩放
//! - `convert` - 批量格式转换
//! - `filter`  - 批量应用滤镜
//! - `detect`  - 检测 GIMP
//!
//! ## 退出码
//! - `0` 全部成功
//! - `1` 批次级错误（目录、模式、GIMP 不可用等）
//! - `2` 批处理完成但有文件失败

use clap::Parser;
use gimp_batch::cli::{Cli, GlobalArgs};
use gimp_batch::commands;
use gimp_batch::config::Config;
use gimp_batch::utils::output;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    let config = match Config::load(cli.global.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            print_error_chain(&e);
            std::process::exit(1);
        }
    };

    setup_logging(&cli.global, &config);

    match commands::run(cli, &config) {
        Ok(status) => std::process::exit(status.exit_code()),
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            print_error_chain(&e);
            std::process::exit(1);
        }
    }
}

/// 日志写到 stderr，`RUST_LOG` 优先
fn setup_logging(global: &GlobalArgs, config: &Config) {
    let level = if global.verbose {
        "debug"
    } else if global.quiet {
        "warn"
    } else {
        config.log_level.as_str()
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gimp_batch={},warn", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

fn print_error_chain(e: &dyn std::error::Error) {
    output::print_error(&e.to_string());
    let mut source = e.source();
    while let Some(cause) = source {
        eprintln!("      caused by: {}", cause);
        source = cause.source();
    }
}
