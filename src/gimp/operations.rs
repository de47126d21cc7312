//! # GIMP 单文件操作
//!
//! 基于 `GimpCli` 的 `FileOperation` 实现：缩放、格式转换、滤镜。
//!
//! ## 参数约定
//! | 操作    | 参数键                                                   |
//! |---------|----------------------------------------------------------|
//! | resize  | `width`, `height`, `maintain_aspect`, `interpolation`    |
//! | convert | `quality`                                                |
//! | filter  | `filter_name` 以及滤镜自身参数（`radius`, `amount`, ...） |
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `gimp/cli.rs`, `gimp/script.rs`

use super::cli::GimpCli;
use super::script::{self, Filter, Interpolation};
use crate::batch::is_supported_extension;
use crate::error::{GimpBatchError, Result};
use crate::models::Parameters;
use crate::operation::{FileOperation, OperationResult};

use anyhow::{anyhow, bail, Context};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// 默认输出质量
pub const DEFAULT_QUALITY: u8 = 90;

// ─────────────────────────────────────────────────────────────
// 参数读取
// ─────────────────────────────────────────────────────────────

fn get_u64(params: &Parameters, key: &str) -> anyhow::Result<Option<u64>> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .map(Some)
            .ok_or_else(|| anyhow!("parameter '{}' must be a non-negative integer", key)),
    }
}

fn get_i64(params: &Parameters, key: &str) -> anyhow::Result<Option<i64>> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_i64()
            .map(Some)
            .ok_or_else(|| anyhow!("parameter '{}' must be an integer", key)),
    }
}

fn get_f64(params: &Parameters, key: &str) -> anyhow::Result<Option<f64>> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| anyhow!("parameter '{}' must be a number", key)),
    }
}

fn get_bool(params: &Parameters, key: &str) -> anyhow::Result<Option<bool>> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_bool()
            .map(Some)
            .ok_or_else(|| anyhow!("parameter '{}' must be a boolean", key)),
    }
}

fn get_str<'p>(params: &'p Parameters, key: &str) -> anyhow::Result<Option<&'p str>> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_str()
            .map(Some)
            .ok_or_else(|| anyhow!("parameter '{}' must be a string", key)),
    }
}

fn get_quality(params: &Parameters) -> anyhow::Result<u8> {
    match get_u64(params, "quality")? {
        None => Ok(DEFAULT_QUALITY),
        Some(q) if (1..=100).contains(&q) => Ok(q as u8),
        Some(q) => bail!("quality must be between 1 and 100, got {}", q),
    }
}

/// 将参数错误转换为批处理前的参数校验错误
fn invalid(e: anyhow::Error) -> GimpBatchError {
    GimpBatchError::InvalidArgument(format!("{:#}", e))
}

/// 外部程序是否真正写出了结果
fn output_written(output: &Path) -> bool {
    fs::metadata(output).map(|m| m.len() > 0).unwrap_or(false)
}

// ─────────────────────────────────────────────────────────────
// Resize
// ─────────────────────────────────────────────────────────────

/// 缩放参数
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSpec {
    pub width: u32,
    pub height: u32,
    pub maintain_aspect: bool,
    pub interpolation: Interpolation,
}

impl ResizeSpec {
    pub fn from_parameters(params: &Parameters) -> anyhow::Result<Self> {
        let dimension = |key: &str| -> anyhow::Result<u32> {
            let value = get_u64(params, key)?.ok_or_else(|| anyhow!("missing parameter '{}'", key))?;
            if value == 0 || value > u64::from(u32::MAX) {
                bail!("{} must be a positive integer", key);
            }
            Ok(value as u32)
        };

        let interpolation = match get_str(params, "interpolation")? {
            None => Interpolation::Lanczos,
            Some(name) => Interpolation::parse(name)
                .ok_or_else(|| anyhow!("unknown interpolation method '{}'", name))?,
        };

        Ok(Self {
            width: dimension("width")?,
            height: dimension("height")?,
            maintain_aspect: get_bool(params, "maintain_aspect")?.unwrap_or(true),
            interpolation,
        })
    }
}

/// 缩放操作
pub struct ResizeOperation {
    gimp: GimpCli,
}

impl ResizeOperation {
    pub fn new(gimp: GimpCli) -> Self {
        Self { gimp }
    }

    /// 在启动批处理前校验参数
    pub fn validate(params: &Parameters) -> Result<()> {
        ResizeSpec::from_parameters(params).map(|_| ()).map_err(invalid)
    }
}

impl FileOperation for ResizeOperation {
    fn process(&self, input: &Path, output: &Path, params: &Parameters) -> OperationResult {
        let spec = ResizeSpec::from_parameters(params)?;
        let script = script::resize_script(
            input,
            output,
            spec.width,
            spec.height,
            spec.maintain_aspect,
            spec.interpolation,
        );
        self.gimp
            .run_script_fu(&script)
            .with_context(|| format!("resize failed for {}", input.display()))?;
        Ok(output_written(output))
    }

    fn name(&self) -> &str {
        "resize"
    }
}

// ─────────────────────────────────────────────────────────────
// Convert
// ─────────────────────────────────────────────────────────────

/// 格式转换操作
pub struct ConvertOperation {
    gimp: GimpCli,
    format: String,
}

impl ConvertOperation {
    /// 目标格式必须在受支持的扩展名列表中
    pub fn new(gimp: GimpCli, format: &str) -> Result<Self> {
        let format = format.trim_start_matches('.').to_ascii_lowercase();
        if !is_supported_extension(&format) {
            return Err(GimpBatchError::InvalidArgument(format!(
                "unsupported output format '{}'",
                format
            )));
        }
        Ok(Self { gimp, format })
    }

    pub fn validate(params: &Parameters) -> Result<()> {
        get_quality(params).map(|_| ()).map_err(invalid)
    }
}

impl FileOperation for ConvertOperation {
    fn process(&self, input: &Path, output: &Path, params: &Parameters) -> OperationResult {
        let quality = get_quality(params)?;
        let script = script::convert_script(input, output, quality);
        self.gimp
            .run_script_fu(&script)
            .with_context(|| format!("conversion to {} failed for {}", self.format, input.display()))?;
        Ok(output_written(output))
    }

    fn output_extension(&self) -> Option<&str> {
        Some(self.format.as_str())
    }

    fn name(&self) -> &str {
        "convert"
    }
}

// ─────────────────────────────────────────────────────────────
// Filter
// ─────────────────────────────────────────────────────────────

/// 支持的滤镜名称
pub const FILTER_NAMES: &[&str] = &["blur", "sharpen", "grayscale", "invert", "brightness-contrast"];

impl Filter {
    /// 从参数解析滤镜
    pub fn from_parameters(params: &Parameters) -> anyhow::Result<Self> {
        let name = get_str(params, "filter_name")?.ok_or_else(|| anyhow!("missing parameter 'filter_name'"))?;

        let filter = match name.to_ascii_lowercase().as_str() {
            "blur" => {
                let radius = get_f64(params, "radius")?.unwrap_or(5.0);
                if radius <= 0.0 {
                    bail!("radius must be positive");
                }
                Filter::Blur { radius }
            }
            "sharpen" => {
                let amount = get_f64(params, "amount")?.unwrap_or(0.5);
                if amount <= 0.0 {
                    bail!("amount must be positive");
                }
                Filter::Sharpen { amount }
            }
            "grayscale" | "desaturate" => Filter::Grayscale,
            "invert" => Filter::Invert,
            "brightness-contrast" | "brightness_contrast" => {
                let range = |key: &str| -> anyhow::Result<i32> {
                    let v = get_i64(params, key)?.unwrap_or(0);
                    if !(-127..=127).contains(&v) {
                        bail!("{} must be between -127 and 127", key);
                    }
                    Ok(v as i32)
                };
                Filter::BrightnessContrast {
                    brightness: range("brightness")?,
                    contrast: range("contrast")?,
                }
            }
            other => bail!(
                "unknown filter '{}' (supported: {})",
                other,
                FILTER_NAMES.join(", ")
            ),
        };

        Ok(filter)
    }
}

/// 滤镜操作
pub struct FilterOperation {
    gimp: GimpCli,
}

impl FilterOperation {
    pub fn new(gimp: GimpCli) -> Self {
        Self { gimp }
    }

    pub fn validate(params: &Parameters) -> Result<()> {
        Filter::from_parameters(params).map(|_| ()).map_err(invalid)
    }
}

impl FileOperation for FilterOperation {
    fn process(&self, input: &Path, output: &Path, params: &Parameters) -> OperationResult {
        let filter = Filter::from_parameters(params)?;
        let script = script::filter_script(input, output, &filter);
        self.gimp
            .run_script_fu(&script)
            .with_context(|| format!("filter failed for {}", input.display()))?;
        Ok(output_written(output))
    }

    fn name(&self) -> &str {
        "filter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Parameters {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_resize_spec_defaults() {
        let spec = ResizeSpec::from_parameters(&params(json!({"width": 800, "height": 600}))).unwrap();
        assert_eq!(spec.width, 800);
        assert_eq!(spec.height, 600);
        assert!(spec.maintain_aspect);
        assert_eq!(spec.interpolation, Interpolation::Lanczos);
    }

    #[test]
    fn test_resize_spec_rejects_bad_values() {
        assert!(ResizeSpec::from_parameters(&params(json!({"width": 0, "height": 10}))).is_err());
        assert!(ResizeSpec::from_parameters(&params(json!({"width": -5, "height": 10}))).is_err());
        assert!(ResizeSpec::from_parameters(&params(json!({"height": 10}))).is_err());
        assert!(ResizeSpec::from_parameters(&params(
            json!({"width": 1, "height": 1, "interpolation": "sinc"})
        ))
        .is_err());

        let err = ResizeOperation::validate(&params(json!({"width": "wide", "height": 1})));
        assert!(matches!(err, Err(GimpBatchError::InvalidArgument(_))));
    }

    #[test]
    fn test_convert_format_validation() {
        let gimp = GimpCli::new("gimp", std::time::Duration::from_secs(5));
        let op = ConvertOperation::new(gimp.clone(), ".WebP").unwrap();
        assert_eq!(op.output_extension(), Some("webp"));

        assert!(ConvertOperation::new(gimp, "pdf").is_err());
    }

    #[test]
    fn test_quality_range() {
        assert_eq!(get_quality(&Parameters::new()).unwrap(), DEFAULT_QUALITY);
        assert_eq!(get_quality(&params(json!({"quality": 75}))).unwrap(), 75);
        assert!(ConvertOperation::validate(&params(json!({"quality": 0}))).is_err());
        assert!(ConvertOperation::validate(&params(json!({"quality": 101}))).is_err());
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!(
            Filter::from_parameters(&params(json!({"filter_name": "blur", "radius": 2.5}))).unwrap(),
            Filter::Blur { radius: 2.5 }
        );
        assert_eq!(
            Filter::from_parameters(&params(json!({"filter_name": "INVERT"}))).unwrap(),
            Filter::Invert
        );
        assert_eq!(
            Filter::from_parameters(&params(
                json!({"filter_name": "brightness-contrast", "brightness": 20})
            ))
            .unwrap(),
            Filter::BrightnessContrast {
                brightness: 20,
                contrast: 0
            }
        );
        assert!(Filter::from_parameters(&params(json!({"filter_name": "emboss"}))).is_err());
        assert!(Filter::from_parameters(&params(json!({"radius": 1}))).is_err());
        assert!(FilterOperation::validate(&params(
            json!({"filter_name": "brightness-contrast", "contrast": 500})
        ))
        .is_err());
    }

    #[cfg(unix)]
    mod with_fake_gimp {
        use super::*;
        use crate::batch::BatchCoordinator;
        use crate::models::BatchRequest;
        use std::os::unix::fs::PermissionsExt;
        use std::time::Duration;
        use tempfile::TempDir;

        /// 假 gimp：在 Script-Fu 中找到保存路径并写入内容
        fn fake_gimp(dir: &TempDir, fail_on: &str) -> GimpCli {
            let path = dir.path().join("fake-gimp");
            let script = format!(
                r#"#!/bin/sh
script="$5"
case "$script" in
  *{fail_on}*) echo "GIMP-Error: cannot open" 1>&2; exit 1 ;;
esac
out=$(printf '%s' "$script" | sed -n 's/.*gimp-file-save RUN-NONINTERACTIVE image (car (gimp-image-get-active-drawable image)) "\([^"]*\)".*/\1/p')
printf 'rendered' > "$out"
"#,
                fail_on = fail_on
            );
            fs::write(&path, script).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            GimpCli::new(path, Duration::from_secs(10))
        }

        #[test]
        fn test_filter_batch_through_fake_gimp() {
            let dir = TempDir::new().unwrap();
            let input = dir.path().join("in");
            let output = dir.path().join("out");
            fs::create_dir(&input).unwrap();
            for name in ["a.png", "b.png", "c.png"] {
                fs::write(input.join(name), b"png").unwrap();
            }

            let op = FilterOperation::new(fake_gimp(&dir, "/in/b.png"));
            let request = BatchRequest::new(&input, &output)
                .with_max_workers(2)
                .with_parameter("filter_name", "invert");

            let result = BatchCoordinator::new(&op).run(&request).unwrap();

            assert_eq!(result.total_files, 3);
            assert_eq!(result.succeeded, 2);
            assert_eq!(result.failed, 1);
            assert!(result.failed_files[0].path.ends_with("b.png"));
            assert!(result.failed_files[0].error.contains("cannot open"));
            assert_eq!(fs::read(output.join("a.png")).unwrap(), b"rendered");
            assert!(!output.join("b.png").exists());

            let mut names: Vec<String> = fs::read_dir(&output)
                .unwrap()
                .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
                .collect();
            names.sort();
            assert_eq!(names, vec!["a.png", "c.png"]);
        }

        #[test]
        fn test_silent_gimp_counts_as_failure() {
            let dir = TempDir::new().unwrap();
            let exe = dir.path().join("quiet-gimp");
            fs::write(&exe, "#!/bin/sh\nexit 0\n").unwrap();
            fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();

            let input = dir.path().join("a.png");
            let output = dir.path().join(".a.tmp.png");
            fs::write(&input, b"png").unwrap();
            fs::write(&output, b"").unwrap();

            let op = FilterOperation::new(GimpCli::new(exe, Duration::from_secs(5)));
            let written = op
                .process(&input, &output, &params(json!({"filter_name": "grayscale"})))
                .unwrap();
            assert!(!written);
        }
    }
}
