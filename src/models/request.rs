//! # 批处理请求数据模型
//!
//! 描述一次批处理的输入、输出与操作参数。
//!
//! ## 依赖关系
//! - 被 `batch/coordinator.rs` 使用
//! - 被 `commands/` 构造

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// 操作参数
///
/// 对批处理引擎完全不透明，原样传递给单文件操作。
/// 各键的含义由具体操作（如 `gimp::operations`）定义。
pub type Parameters = BTreeMap<String, Value>;

/// 批处理请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    /// 输入目录
    pub input_directory: PathBuf,
    /// glob 匹配模式
    pub file_pattern: String,
    /// 输出目录
    pub output_directory: PathBuf,
    /// 操作参数
    pub operation_parameters: Parameters,
    /// 最大并行数（至少为 1）
    pub max_workers: usize,
}

impl BatchRequest {
    /// 创建新的批处理请求，默认匹配所有支持的文件
    pub fn new(input_directory: impl Into<PathBuf>, output_directory: impl Into<PathBuf>) -> Self {
        Self {
            input_directory: input_directory.into(),
            file_pattern: "*".to_string(),
            output_directory: output_directory.into(),
            operation_parameters: Parameters::new(),
            max_workers: 1,
        }
    }

    /// 设置匹配模式
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.file_pattern = pattern.to_string();
        self
    }

    /// 设置并行数
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// 设置单个操作参数
    pub fn with_parameter(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.operation_parameters.insert(key.to_string(), value.into());
        self
    }

    /// 合并一组操作参数
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.operation_parameters.extend(parameters);
        self
    }
}

/// 单文件任务
///
/// 每个匹配到的输入文件对应一个任务，仅在一次批处理中存在。
#[derive(Debug, Clone)]
pub struct FileTask {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub parameters: Parameters,
}

impl FileTask {
    /// 根据输入文件推导输出路径
    ///
    /// 输出路径 = 输出目录 + 输入文件名；`extension` 为 `Some` 时替换扩展名。
    pub fn for_input(
        input_path: &Path,
        output_directory: &Path,
        extension: Option<&str>,
        parameters: &Parameters,
    ) -> Self {
        let file_name = input_path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("output"));

        let file_name = match extension {
            Some(ext) => file_name.with_extension(ext.trim_start_matches('.')),
            None => file_name,
        };

        Self {
            input_path: input_path.to_path_buf(),
            output_path: output_directory.join(file_name),
            parameters: parameters.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_keeps_file_name() {
        let task = FileTask::for_input(
            Path::new("/in/photo.PNG"),
            Path::new("/out"),
            None,
            &Parameters::new(),
        );
        assert_eq!(task.output_path, PathBuf::from("/out/photo.PNG"));
    }

    #[test]
    fn test_task_replaces_extension() {
        let task = FileTask::for_input(
            Path::new("/in/photo.png"),
            Path::new("/out"),
            Some(".webp"),
            &Parameters::new(),
        );
        assert_eq!(task.output_path, PathBuf::from("/out/photo.webp"));
    }

    #[test]
    fn test_request_builder() {
        let request = BatchRequest::new("in", "out")
            .with_pattern("*.jpg")
            .with_max_workers(4)
            .with_parameter("width", 800);

        assert_eq!(request.file_pattern, "*.jpg");
        assert_eq!(request.max_workers, 4);
        assert_eq!(request.operation_parameters["width"], Value::from(800));
    }
}
