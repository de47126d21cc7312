//! # detect 命令实现
//!
//! 显示将被使用的 GIMP 可执行文件及其版本。
//!
//! ## 依赖关系
//! - 使用 `gimp::detect_gimp`, `gimp::GimpCli`

use crate::cli::GlobalArgs;
use crate::config::Config;
use crate::error::Result;
use crate::gimp::{detect_gimp, GimpCli};
use crate::utils::output;

use super::RunStatus;
use std::path::Path;
use std::time::Duration;

/// 执行 detect 命令
pub fn execute(explicit: Option<&Path>, global: &GlobalArgs, config: &Config) -> Result<RunStatus> {
    let executable = detect_gimp(explicit.or(config.gimp_executable.as_deref()))?;

    let gimp = GimpCli::new(executable, Duration::from_secs(config.process_timeout_secs));
    let version = match gimp.version() {
        Ok(version) => Some(version),
        Err(e) => {
            tracing::warn!(error = %e, "could not query GIMP version");
            None
        }
    };

    if global.json {
        let report = serde_json::json!({
            "executable": gimp.executable(),
            "version": version,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(RunStatus::Success);
    }

    output::print_success(&format!("GIMP found: {}", gimp.executable().display()));
    match version {
        Some(version) if !version.is_empty() => output::print_info(&version),
        _ => output::print_warning("GIMP did not report a version"),
    }

    Ok(RunStatus::Success)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    #[test]
    fn test_reports_explicit_executable() {
        let dir = TempDir::new().unwrap();
        let exe = dir.path().join("gimp-console");
        fs::write(&exe, "#!/bin/sh\necho 'GIMP version 2.10.36'\n").unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();

        let global = GlobalArgs {
            config: None,
            verbose: false,
            quiet: false,
            json: true,
        };
        let status = execute(Some(exe.as_path()), &global, &Config::default()).unwrap();
        assert_eq!(status, RunStatus::Success);
    }
}
