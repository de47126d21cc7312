//! # resize 命令实现
//!
//! ## 依赖关系
//! - 使用 `cli/resize.rs` 定义的参数
//! - 使用 `gimp::ResizeOperation`

use crate::cli::resize::ResizeArgs;
use crate::cli::GlobalArgs;
use crate::config::Config;
use crate::error::Result;
use crate::gimp::ResizeOperation;
use crate::models::Parameters;

use super::RunStatus;
use serde_json::json;

/// 执行 resize 命令
pub fn execute(args: ResizeArgs, global: &GlobalArgs, config: &Config) -> Result<RunStatus> {
    let parameters = parameters(&args, config);
    ResizeOperation::validate(&parameters)?;

    let operation = ResizeOperation::new(super::gimp_cli(&args.batch, config)?);
    super::run_batch(global, &args.batch, config, &operation, parameters)
}

fn parameters(args: &ResizeArgs, config: &Config) -> Parameters {
    let interpolation = args
        .interpolation
        .clone()
        .unwrap_or_else(|| config.default_interpolation.clone());

    let mut parameters = Parameters::new();
    parameters.insert("width".to_string(), json!(args.width));
    parameters.insert("height".to_string(), json!(args.height));
    parameters.insert("maintain_aspect".to_string(), json!(!args.no_keep_aspect));
    parameters.insert("interpolation".to_string(), json!(interpolation));
    parameters
}
