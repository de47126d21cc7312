//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `resize`: 批量缩放
//! - `convert`: 批量格式转换
//! - `filter`: 批量应用滤镜
//! - `detect`: 检测 GIMP 可执行文件
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: batch, convert, filter, resize

pub mod batch;
pub mod convert;
pub mod filter;
pub mod resize;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// gimp-batch - 基于 GIMP 的批量图像处理
#[derive(Parser)]
#[command(name = "gimp-batch")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Atomic, parallel batch image processing driven by GIMP", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// 全局参数
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Path to a TOML config file
    #[arg(long, global = true, env = "GIMP_BATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Suppress progress bar and informational output
    #[arg(short, long, global = true, default_value_t = false)]
    pub quiet: bool,

    /// Print the batch result as JSON
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Resize all matching images
    Resize(resize::ResizeArgs),

    /// Convert all matching images to another format
    Convert(convert::ConvertArgs),

    /// Apply a filter to all matching images
    Filter(filter::FilterArgs),

    /// Show which GIMP executable would be used
    Detect {
        /// Explicit GIMP executable to check
        #[arg(long, env = "GIMP_EXECUTABLE")]
        gimp: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resize() {
        let cli = Cli::try_parse_from([
            "gimp-batch", "resize", "-i", "photos", "-o", "small", "-p", "*.jpg", "--width", "800",
            "--height", "600", "-j", "4", "--json",
        ])
        .unwrap();

        assert!(cli.global.json);
        match cli.command {
            Commands::Resize(args) => {
                assert_eq!(args.batch.input, PathBuf::from("photos"));
                assert_eq!(args.batch.pattern, "*.jpg");
                assert_eq!(args.batch.jobs, Some(4));
                assert_eq!(args.width, 800);
                assert!(!args.no_keep_aspect);
            }
            _ => panic!("expected resize"),
        }
    }

    #[test]
    fn test_parse_filter_params() {
        let cli = Cli::try_parse_from([
            "gimp-batch", "filter", "-i", "in", "-o", "out", "--name", "blur", "--param",
            "radius=2.5", "--param", "label=soft",
        ])
        .unwrap();

        match cli.command {
            Commands::Filter(args) => {
                assert_eq!(args.name, "blur");
                assert_eq!(args.params.len(), 2);
                assert_eq!(args.params[0].0, "radius");
                assert_eq!(args.params[0].1, serde_json::json!(2.5));
                assert_eq!(args.params[1].1, serde_json::json!("soft"));
            }
            _ => panic!("expected filter"),
        }
    }

    #[test]
    fn test_rejects_bad_param() {
        let result = Cli::try_parse_from([
            "gimp-batch", "filter", "-i", "in", "-o", "out", "--name", "blur", "--param", "radius",
        ]);
        assert!(result.is_err());
    }
}
