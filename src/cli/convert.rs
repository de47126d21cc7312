//! # convert 子命令 CLI 定义
//!
//! 批量转换图像格式
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/convert.rs`

use super::batch::BatchArgs;
use clap::{Args, ValueEnum};

/// 支持的输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// JPEG (lossy, honours --quality)
    Jpg,
    /// Portable Network Graphics
    Png,
    /// Tagged Image File Format
    Tiff,
    /// Windows bitmap
    Bmp,
    /// Graphics Interchange Format
    Gif,
    /// WebP
    Webp,
    /// GIMP native format (layers preserved)
    Xcf,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Gif => "gif",
            OutputFormat::Webp => "webp",
            OutputFormat::Xcf => "xcf",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// convert 子命令参数
#[derive(Args, Debug)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub batch: BatchArgs,

    /// Target output format
    #[arg(short, long, value_enum)]
    pub format: OutputFormat,

    /// JPEG quality 1-100 [default: from config]
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,
}
