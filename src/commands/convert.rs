//! # convert 命令实现
//!
//! 批量转换图像格式，输出文件扩展名替换为目标格式。
//!
//! ## 依赖关系
//! - 使用 `cli/convert.rs` 定义的参数
//! - 使用 `gimp::ConvertOperation`

use crate::cli::convert::ConvertArgs;
use crate::cli::GlobalArgs;
use crate::config::Config;
use crate::error::Result;
use crate::gimp::ConvertOperation;
use crate::models::Parameters;

use super::RunStatus;
use serde_json::json;

/// 执行 convert 命令
pub fn execute(args: ConvertArgs, global: &GlobalArgs, config: &Config) -> Result<RunStatus> {
    let quality = args.quality.unwrap_or(config.default_quality);

    let mut parameters = Parameters::new();
    parameters.insert("quality".to_string(), json!(quality));
    ConvertOperation::validate(&parameters)?;

    let gimp = super::gimp_cli(&args.batch, config)?;
    let operation = ConvertOperation::new(gimp, args.format.extension())?;
    super::run_batch(global, &args.batch, config, &operation, parameters)
}
