//! # 配置模块
//!
//! 从 TOML 文件加载运行配置，缺省项使用默认值。
//!
//! ## 查找顺序
//! 1. `--config <path>` 或环境变量 `GIMP_BATCH_CONFIG`
//! 2. `./gimp-batch.toml`
//! 3. `./config/gimp-batch.toml`
//! 4. 内置默认值
//!
//! ## 依赖关系
//! - 被 `main.rs`, `commands/` 使用
//! - 使用 `serde` + `toml` 反序列化

use crate::error::{GimpBatchError, Result};

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 默认配置文件位置
const DEFAULT_CONFIG_PATHS: &[&str] = &["gimp-batch.toml", "config/gimp-batch.toml"];

/// 支持的插值方法
pub const INTERPOLATION_METHODS: &[&str] = &["none", "linear", "cubic", "lanczos", "auto"];

/// 运行配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GIMP 可执行文件路径（`None` 时自动检测）
    pub gimp_executable: Option<PathBuf>,
    /// 最大并行 GIMP 进程数
    pub max_workers: usize,
    /// 单次 GIMP 调用超时（秒）
    pub process_timeout_secs: u64,
    /// 默认 JPEG 质量
    pub default_quality: u8,
    /// 默认插值方法
    pub default_interpolation: String,
    /// 日志级别
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gimp_executable: None,
            max_workers: 3,
            process_timeout_secs: 30,
            default_quality: 95,
            default_interpolation: "lanczos".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// 加载配置
    ///
    /// 显式指定的文件必须存在；否则按默认位置查找，都不存在时使用默认值。
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        for candidate in DEFAULT_CONFIG_PATHS {
            let path = Path::new(candidate);
            if path.is_file() {
                return Self::from_file(path);
            }
        }

        Ok(Self::default())
    }

    /// 从文件加载
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| GimpBatchError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        let config = Self::from_toml_str(&content).map_err(|reason| GimpBatchError::ConfigError {
            path: path.display().to_string(),
            reason,
        })?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// 解析 TOML 文本并校验
    fn from_toml_str(content: &str) -> std::result::Result<Self, String> {
        let config: Config = toml::from_str(content).map_err(|e| e.to_string())?;
        config.validated()
    }

    /// 校验并规范化：数值范围截断，插值方法必须合法
    fn validated(mut self) -> std::result::Result<Self, String> {
        self.max_workers = self.max_workers.clamp(1, 10);
        self.process_timeout_secs = self.process_timeout_secs.clamp(5, 300);
        self.default_quality = self.default_quality.clamp(1, 100);

        self.default_interpolation = self.default_interpolation.to_ascii_lowercase();
        if !INTERPOLATION_METHODS.contains(&self.default_interpolation.as_str()) {
            return Err(format!(
                "default_interpolation must be one of: {}",
                INTERPOLATION_METHODS.join(", ")
            ));
        }

        self.log_level = self.log_level.to_ascii_lowercase();
        if !["trace", "debug", "info", "warn", "error"].contains(&self.log_level.as_str()) {
            return Err(format!("invalid log_level '{}'", self.log_level));
        }

        Ok(self)
    }
}
