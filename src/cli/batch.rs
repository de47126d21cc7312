//! # 批处理公共参数
//!
//! 所有批处理子命令共享的输入/输出与并行参数。
//!
//! ## 依赖关系
//! - 被 `cli/resize.rs`, `cli/convert.rs`, `cli/filter.rs` 通过 `flatten` 引入

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Input directory containing images
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory for processed images
    #[arg(short, long)]
    pub output: PathBuf,

    /// Glob pattern for input files
    #[arg(short, long, default_value = "*")]
    pub pattern: String,

    /// Number of parallel GIMP processes [default: from config]
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// GIMP executable to use instead of auto-detection
    #[arg(long, env = "GIMP_EXECUTABLE")]
    pub gimp: Option<PathBuf>,

    /// Per-image GIMP timeout in seconds [default: from config]
    #[arg(long)]
    pub timeout: Option<u64>,
}
