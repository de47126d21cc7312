//! # filter 命令实现
//!
//! ## 依赖关系
//! - 使用 `cli/filter.rs` 定义的参数
//! - 使用 `gimp::FilterOperation`

use crate::cli::filter::FilterArgs;
use crate::cli::GlobalArgs;
use crate::config::Config;
use crate::error::Result;
use crate::gimp::FilterOperation;
use crate::models::Parameters;

use super::RunStatus;
use serde_json::Value;

/// 执行 filter 命令
pub fn execute(args: FilterArgs, global: &GlobalArgs, config: &Config) -> Result<RunStatus> {
    let parameters = parameters(&args);
    FilterOperation::validate(&parameters)?;

    let operation = FilterOperation::new(super::gimp_cli(&args.batch, config)?);
    super::run_batch(global, &args.batch, config, &operation, parameters)
}

/// `--name` 优先于 `--param filter_name=...`
fn parameters(args: &FilterArgs) -> Parameters {
    let mut parameters: Parameters = args.params.iter().cloned().collect();
    parameters.insert("filter_name".to_string(), Value::String(args.name.clone()));
    parameters
}
