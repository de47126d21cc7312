//! # Script-Fu 脚本生成
//!
//! 生成 GIMP 2.10 批处理模式使用的 Script-Fu 脚本。
//!
//! 所有脚本结构相同：加载 → 处理 → 保存 → 释放图像。
//! 非 XCF 输出会先合并图层，否则大多数格式只会保存当前图层。
//!
//! ## 依赖关系
//! - 被 `gimp/operations.rs` 调用
//! - 无外部模块依赖

use std::path::Path;

/// 插值方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    None,
    Linear,
    Cubic,
    Lanczos,
    Auto,
}

impl Interpolation {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "none" => Some(Interpolation::None),
            "linear" => Some(Interpolation::Linear),
            "cubic" => Some(Interpolation::Cubic),
            "lanczos" => Some(Interpolation::Lanczos),
            "auto" => Some(Interpolation::Auto),
            _ => None,
        }
    }

    /// GIMP 2.10 中的常量名（Lanczos 已由 NoHalo 取代）
    fn gimp_constant(self) -> &'static str {
        match self {
            Interpolation::None => "INTERPOLATION-NONE",
            Interpolation::Linear => "INTERPOLATION-LINEAR",
            Interpolation::Cubic | Interpolation::Auto => "INTERPOLATION-CUBIC",
            Interpolation::Lanczos => "INTERPOLATION-NOHALO",
        }
    }
}

/// 滤镜
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// 高斯模糊，半径（像素）
    Blur { radius: f64 },
    /// USM 锐化，强度
    Sharpen { amount: f64 },
    /// 去色
    Grayscale,
    /// 反相
    Invert,
    /// 亮度/对比度，取值范围 -127..=127
    BrightnessContrast { brightness: i32, contrast: i32 },
}

/// 转义 Script-Fu 字符串字面量
pub fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn quoted(path: &Path) -> String {
    format!("\"{}\"", escape(&path.to_string_lossy()))
}

fn is_xcf(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("xcf"))
        .unwrap_or(false)
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "jpg" | "jpeg"))
        .unwrap_or(false)
}

/// 拼装完整脚本
fn wrap(input: &Path, output: &Path, body: &str, save: &str) -> String {
    let drawable = if is_xcf(output) {
        "(car (gimp-image-get-active-drawable image))"
    } else {
        "(car (gimp-image-flatten image))"
    };

    format!(
        r#"(let* ((image (car (gimp-file-load RUN-NONINTERACTIVE {input} {input})))
       (drawable {drawable}))
  {body}
  {save}
  (gimp-image-delete image))"#,
        input = quoted(input),
        drawable = drawable,
        body = body,
        save = save,
    )
}

/// 默认保存命令：由扩展名决定格式
fn save_default(output: &Path) -> String {
    let out = quoted(output);
    format!(
        "(gimp-file-save RUN-NONINTERACTIVE image (car (gimp-image-get-active-drawable image)) {} {})",
        out, out
    )
}

/// JPEG 保存命令，质量 1..=100
fn save_jpeg(output: &Path, quality: u8) -> String {
    let out = quoted(output);
    format!(
        "(file-jpeg-save RUN-NONINTERACTIVE image (car (gimp-image-get-active-drawable image)) {} {} {:.2} 0 1 0 \"\" 2 1 0 0)",
        out,
        out,
        f64::from(quality.clamp(1, 100)) / 100.0
    )
}

/// 缩放脚本
///
/// `keep_aspect` 时按比例缩放到能放入 `width`×`height` 的最大尺寸。
pub fn resize_script(
    input: &Path,
    output: &Path,
    width: u32,
    height: u32,
    keep_aspect: bool,
    interpolation: Interpolation,
) -> String {
    let size = if keep_aspect {
        format!(
            r#"(let* ((w (car (gimp-image-width image)))
         (h (car (gimp-image-height image)))
         (ratio (min (/ {width} w) (/ {height} h)))
         (new-w (max 1 (inexact->exact (round (* w ratio)))))
         (new-h (max 1 (inexact->exact (round (* h ratio))))))
    (gimp-image-scale image new-w new-h))"#,
            width = width,
            height = height
        )
    } else {
        format!("(gimp-image-scale image {} {})", width, height)
    };

    let body = format!(
        "(gimp-context-set-interpolation {})\n  {}",
        interpolation.gimp_constant(),
        size
    );
    wrap(input, output, &body, &save_default(output))
}

/// 格式转换脚本，输出格式由输出扩展名决定
pub fn convert_script(input: &Path, output: &Path, quality: u8) -> String {
    let save = if is_jpeg(output) {
        save_jpeg(output, quality)
    } else {
        save_default(output)
    };
    wrap(input, output, "(gimp-image-undo-disable image)", &save)
}

/// 滤镜脚本
pub fn filter_script(input: &Path, output: &Path, filter: &Filter) -> String {
    let body = match filter {
        Filter::Blur { radius } => format!(
            "(plug-in-gauss RUN-NONINTERACTIVE image drawable {:.2} {:.2} 0)",
            radius, radius
        ),
        Filter::Sharpen { amount } => format!(
            "(plug-in-unsharp-mask RUN-NONINTERACTIVE image drawable 5.0 {:.2} 0)",
            amount
        ),
        Filter::Grayscale => "(gimp-drawable-desaturate drawable DESATURATE-LUMINANCE)".to_string(),
        Filter::Invert => "(gimp-drawable-invert drawable FALSE)".to_string(),
        Filter::BrightnessContrast {
            brightness,
            contrast,
        } => format!(
            "(gimp-drawable-brightness-contrast drawable {:.4} {:.4})",
            f64::from((*brightness).clamp(-127, 127)) / 127.0,
            f64::from((*contrast).clamp(-127, 127)) / 127.0
        ),
    };
    wrap(input, output, &body, &save_default(output))
}
