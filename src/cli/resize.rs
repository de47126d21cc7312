//! # resize 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/resize.rs`

use super::batch::BatchArgs;
use clap::Args;

/// resize 子命令参数
#[derive(Args, Debug)]
pub struct ResizeArgs {
    #[command(flatten)]
    pub batch: BatchArgs,

    /// Target width in pixels
    #[arg(long)]
    pub width: u32,

    /// Target height in pixels
    #[arg(long)]
    pub height: u32,

    /// Scale to exactly WIDTHxHEIGHT instead of fitting inside it
    #[arg(long, default_value_t = false)]
    pub no_keep_aspect: bool,

    /// Interpolation method (none, linear, cubic, lanczos, auto) [default: from config]
    #[arg(long)]
    pub interpolation: Option<String>,
}
