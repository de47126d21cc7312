//! # GIMP 命令行封装
//!
//! 以无界面批处理模式运行 Script-Fu 脚本。
//!
//! ## 功能
//! - `gimp -i -d -f -b <script> -b "(gimp-quit 0)"`
//! - 捕获 stdout/stderr
//! - 超时后终止子进程及其进程组（包括仍持有输出管道的后代进程）
//!
//! ## 依赖关系
//! - 被 `gimp/operations.rs` 调用

use crate::error::{GimpBatchError, Result};

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// 轮询子进程状态的间隔
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// GIMP 批处理调用器
#[derive(Debug, Clone)]
pub struct GimpCli {
    executable: PathBuf,
    timeout: Duration,
}

impl GimpCli {
    pub fn new(executable: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            executable: executable.into(),
            timeout,
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// 执行 Script-Fu 脚本，返回 GIMP 的输出（stdout + stderr）
    pub fn run_script_fu(&self, script: &str) -> Result<String> {
        tracing::trace!(script = %script, "running script-fu");
        self.run(&["-i", "-d", "-f", "-b", script, "-b", "(gimp-quit 0)"])
    }

    /// `gimp --version` 的第一行
    pub fn version(&self) -> Result<String> {
        let output = self.run(&["--version"])?;
        Ok(output.lines().next().unwrap_or_default().trim().to_string())
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let command = self.executable.display().to_string();
        let deadline = Instant::now() + self.timeout;

        let mut cmd = Command::new(&self.executable);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // 独立进程组：超时时连同 GIMP 派生的插件进程一起终止
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let mut child = cmd.spawn().map_err(|e| GimpBatchError::CommandSpawnError {
            command: command.clone(),
            source: e,
        })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = self.wait(&mut child, deadline, &command)?;

        // 子进程已退出，但其后代可能仍持有管道
        let (stdout, stderr) = match (collect(stdout, deadline), collect(stderr, deadline)) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            _ => {
                kill_tree(&mut child);
                return Err(self.timed_out(&command));
            }
        };

        if !status.success() {
            return Err(GimpBatchError::CommandFailed {
                command,
                stderr: if stderr.trim().is_empty() {
                    format!("exited with {}", status)
                } else {
                    stderr.trim().to_string()
                },
            });
        }

        Ok(format!("{}{}", stdout, stderr))
    }

    /// 等待子进程结束，超过截止时间则终止
    fn wait(&self, child: &mut Child, deadline: Instant, command: &str) -> Result<ExitStatus> {
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) if Instant::now() >= deadline => {
                    kill_tree(child);
                    return Err(self.timed_out(command));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    return Err(GimpBatchError::CommandSpawnError {
                        command: command.to_string(),
                        source: e,
                    })
                }
            }
        }
    }

    fn timed_out(&self, command: &str) -> GimpBatchError {
        GimpBatchError::CommandTimeout {
            command: command.to_string(),
            seconds: self.timeout.as_secs(),
        }
    }
}

/// 终止子进程及其所在进程组
fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
            // SAFETY: kill 只接收整数参数；负 pid 指向 spawn 时创建的进程组
            unsafe {
                libc::kill(-pgid, libc::SIGKILL);
            }
        }
    }
    // 进程可能恰好已退出，失败可忽略
    let _ = child.kill();
    let _ = child.wait();
}

/// 在后台线程读取管道，避免缓冲区写满导致子进程阻塞
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Receiver<String>> {
    pipe.map(|mut pipe| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            let _ = tx.send(String::from_utf8_lossy(&buf).to_string());
        });
        rx
    })
}

/// 在截止时间前取回管道内容；超时返回 `None`
fn collect(rx: Option<Receiver<String>>, deadline: Instant) -> Option<String> {
    let Some(rx) = rx else {
        return Some(String::new());
    };
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(output) => Some(output),
        Err(RecvTimeoutError::Disconnected) => Some(String::new()),
        Err(RecvTimeoutError::Timeout) => None,
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    /// 写一个假的 gimp 脚本
    fn fake_gimp(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("fake-gimp");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_success_captures_output() {
        let dir = TempDir::new().unwrap();
        let exe = fake_gimp(&dir, "echo \"batch command executed successfully\"\necho warn 1>&2");

        let output = GimpCli::new(exe, Duration::from_secs(5))
            .run_script_fu("(gimp-message \"hi\")")
            .unwrap();
        assert!(output.contains("executed successfully"));
        assert!(output.contains("warn"));
    }

    #[test]
    fn test_arguments_passed() {
        let dir = TempDir::new().unwrap();
        let exe = fake_gimp(&dir, "for a in \"$@\"; do echo \"[$a]\"; done");

        let output = GimpCli::new(exe, Duration::from_secs(5))
            .run_script_fu("(script)")
            .unwrap();
        assert!(output.contains("[-i]"));
        assert!(output.contains("[(script)]"));
        assert!(output.contains("[(gimp-quit 0)]"));
    }

    #[test]
    fn test_version_first_line() {
        let dir = TempDir::new().unwrap();
        let exe = fake_gimp(&dir, "echo 'GNU Image Manipulation Program version 2.10.36'\necho extra");

        let version = GimpCli::new(exe, Duration::from_secs(5)).version().unwrap();
        assert_eq!(version, "GNU Image Manipulation Program version 2.10.36");
    }

    #[test]
    fn test_nonzero_exit() {
        let dir = TempDir::new().unwrap();
        let exe = fake_gimp(&dir, "echo 'procedure not found' 1>&2\nexit 3");

        let result = GimpCli::new(exe, Duration::from_secs(5)).run_script_fu("(x)");
        match result {
            Err(GimpBatchError::CommandFailed { stderr, .. }) => {
                assert!(stderr.contains("procedure not found"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_timeout_kills_process() {
        let dir = TempDir::new().unwrap();
        let exe = fake_gimp(&dir, "exec sleep 10");

        let started = Instant::now();
        let result = GimpCli::new(exe, Duration::from_millis(200)).run_script_fu("(x)");

        assert!(matches!(result, Err(GimpBatchError::CommandTimeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_timeout_covers_lingering_descendants() {
        let dir = TempDir::new().unwrap();
        let exe = fake_gimp(&dir, "sleep 6 &\nexit 0");

        let started = Instant::now();
        let result = GimpCli::new(exe, Duration::from_secs(1)).run_script_fu("(x)");

        assert!(matches!(result, Err(GimpBatchError::CommandTimeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_missing_executable() {
        let dir = TempDir::new().unwrap();
        let result =
            GimpCli::new(dir.path().join("absent"), Duration::from_secs(1)).run_script_fu("(x)");
        assert!(matches!(result, Err(GimpBatchError::CommandSpawnError { .. })));
    }
}
