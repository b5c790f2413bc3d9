//! External process execution.
//!
//! Every external tool (ffmpeg, whisper) goes through a [`CommandRunner`]:
//! the child runs to completion, both streams are captured, and a non-zero
//! exit becomes [`SubtextError::ExternalToolFailure`] carrying the captured
//! diagnostics.

use crate::error::{Result, SubtextError};
use async_trait::async_trait;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, instrument};

/// A single external command: program, ordered arguments and an optional
/// working directory.
#[derive(Debug, Clone)]
pub struct Invocation {
    program: String,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
}

impl Invocation {
    /// Create an invocation of `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Run the program from `dir` instead of the caller's directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Runs external commands to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Execute the invocation and return its captured standard output.
    async fn run(&self, invocation: &Invocation) -> Result<String>;
}

/// [`CommandRunner`] backed by real child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// Create a runner without a deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner that kills any child still running after `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    #[instrument(skip_all, fields(program = %invocation.program()))]
    async fn run(&self, invocation: &Invocation) -> Result<String> {
        let tool = invocation.program().to_string();
        debug!("Running: {}", invocation);

        let mut command = Command::new(invocation.program());
        command
            .args(invocation.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = invocation.working_dir() {
            command.current_dir(dir);
        }

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SubtextError::ToolNotFound(tool));
            }
            Err(e) => {
                return Err(SubtextError::ExternalToolFailure {
                    tool,
                    detail: format!("could not start process: {e}"),
                });
            }
        };

        // Dropping the wait future on timeout drops the child, and
        // kill_on_drop terminates it.
        let waited = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(SubtextError::ExternalToolFailure {
                        tool,
                        detail: format!("timed out after {}s", limit.as_secs_f64()),
                    });
                }
            },
            None => child.wait_with_output().await,
        };

        let output = waited.map_err(|e| SubtextError::ExternalToolFailure {
            tool: tool.clone(),
            detail: format!("failed waiting for process: {e}"),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let diagnostics = if stderr.trim().is_empty() {
                stdout.trim()
            } else {
                stderr.trim()
            };
            return Err(SubtextError::ExternalToolFailure {
                tool,
                detail: format!("{}: {}", output.status, diagnostics),
            });
        }

        Ok(stdout)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str) -> Invocation {
        Invocation::new("sh").arg("-c").arg(script)
    }

    #[tokio::test]
    async fn test_captures_stdout() {
        let out = ProcessRunner::new().run(&shell("echo hello")).await.unwrap();
        assert_eq!(out, "hello\n");
    }

    #[tokio::test]
    async fn test_nonzero_exit_carries_stderr() {
        let err = ProcessRunner::new()
            .run(&shell("echo partial; echo 'codec exploded' >&2; exit 3"))
            .await
            .unwrap_err();

        match err {
            SubtextError::ExternalToolFailure { tool, detail } => {
                assert_eq!(tool, "sh");
                assert!(detail.contains("codec exploded"), "detail was: {detail}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_nonzero_exit_without_stderr_uses_stdout() {
        let err = ProcessRunner::new()
            .run(&shell("echo only-stdout; exit 1"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("only-stdout"));
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let err = ProcessRunner::new()
            .run(&Invocation::new("subtext-no-such-binary-4b1d"))
            .await
            .unwrap_err();
        assert!(matches!(err, SubtextError::ToolNotFound(name) if name == "subtext-no-such-binary-4b1d"));
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let runner = ProcessRunner::with_timeout(Some(Duration::from_millis(200)));
        let err = runner.run(&shell("sleep 5")).await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_runs_in_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let expected = dir.path().canonicalize().unwrap();
        let out = ProcessRunner::new()
            .run(&shell("pwd -P").current_dir(dir.path()))
            .await
            .unwrap();
        assert_eq!(out.trim(), expected.to_string_lossy());
    }

    #[test]
    fn test_display() {
        let inv = Invocation::new("ffmpeg").args(["-i", "in.mp4", "-y"]);
        assert_eq!(inv.to_string(), "ffmpeg -i in.mp4 -y");
    }
}
