//! # filter 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/filter.rs`

use super::batch::BatchArgs;
use clap::Args;
use serde_json::Value;

/// filter 子命令参数
#[derive(Args, Debug)]
pub struct FilterArgs {
    #[command(flatten)]
    pub batch: BatchArgs,

    /// Filter to apply (blur, sharpen, grayscale, invert, brightness-contrast)
    #[arg(short, long)]
    pub name: String,

    /// Filter parameter as KEY=VALUE, repeatable (e.g. --param radius=3)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, Value)>,
}

/// 解析 `key=value`：数字与布尔值按 JSON 解析，其他视为字符串
fn parse_param(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }

    let value = value.trim();
    let parsed = match serde_json::from_str::<Value>(value) {
        Ok(v @ (Value::Number(_) | Value::Bool(_))) => v,
        _ => Value::String(value.to_string()),
    };

    Ok((key.to_string(), parsed))
}
