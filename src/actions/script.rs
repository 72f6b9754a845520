//! Script-backed action executor.
//!
//! Each action maps to `<scripts_dir>/<action>.sh`. The script performs the
//! credential-aware HTTP call and prints markers such as `HTTP_STATUS:201`.
//! Provides:
//! - Argument passing as separate argv entries (no shell interpolation)
//! - Per-action timeout enforcement
//! - Output capture and truncation

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::actions::{ActionExecutor, ActionKind, ActionRequest};
use crate::config::SkillConfig;
use crate::error::ActionError;

/// Maximum raw output kept from a script (64KB).
const MAX_OUTPUT_SIZE: usize = 64 * 1024;

/// Runs action scripts with an interpreter.
#[derive(Debug, Clone)]
pub struct ScriptExecutor {
    scripts_dir: PathBuf,
    interpreter: String,
    setup_timeout: Duration,
    status_timeout: Duration,
    post_timeout: Duration,
}

impl ScriptExecutor {
    pub fn new(config: &SkillConfig) -> Self {
        Self {
            scripts_dir: config.scripts_dir.clone(),
            interpreter: config.interpreter.clone(),
            setup_timeout: config.timeout_for(ActionKind::SetupOwnerEmail),
            status_timeout: config.timeout_for(ActionKind::CheckStatus),
            post_timeout: config.timeout_for(ActionKind::CreatePost),
        }
    }

    /// Set the interpreter used to run scripts.
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    /// Use the same timeout for every action.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.setup_timeout = timeout;
        self.status_timeout = timeout;
        self.post_timeout = timeout;
        self
    }

    fn timeout_for(&self, kind: ActionKind) -> Duration {
        match kind {
            ActionKind::SetupOwnerEmail => self.setup_timeout,
            ActionKind::CheckStatus => self.status_timeout,
            ActionKind::CreatePost => self.post_timeout,
        }
    }

    /// Path of the script backing an action.
    pub fn script_path(&self, kind: ActionKind) -> PathBuf {
        self.scripts_dir.join(format!("{}.sh", kind.as_str()))
    }

    async fn run_script(
        &self,
        kind: ActionKind,
        script: &Path,
        args: &[String],
        timeout: Duration,
    ) -> Result<String, ActionError> {
        let mut command = Command::new(&self.interpreter);
        command
            .arg(script)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|e| ActionError::SpawnFailed {
            action: kind.to_string(),
            reason: e.to_string(),
        })?;

        let mut stdout_pipe = child.stdout.take();
        let mut stderr_pipe = child.stderr.take();

        let result = tokio::time::timeout(timeout, async {
            let mut stdout = Vec::new();
            let mut stderr = Vec::new();
            let read_out = async {
                match stdout_pipe.as_mut() {
                    Some(out) => out.read_to_end(&mut stdout).await.map(|_| ()),
                    None => Ok(()),
                }
            };
            let read_err = async {
                match stderr_pipe.as_mut() {
                    Some(err) => err.read_to_end(&mut stderr).await.map(|_| ()),
                    None => Ok(()),
                }
            };
            let (out_res, err_res) = tokio::join!(read_out, read_err);
            out_res?;
            err_res?;
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((stdout, stderr, status.code().unwrap_or(-1)))
        })
        .await;

        match result {
            Ok(Ok((stdout, stderr, code))) => {
                let stdout = String::from_utf8_lossy(&stdout);
                let stderr = String::from_utf8_lossy(&stderr);
                let output = if stderr.trim().is_empty() {
                    stdout.into_owned()
                } else if stdout.is_empty() {
                    stderr.into_owned()
                } else {
                    format!("{}\n{}", stdout, stderr)
                };
                debug!(action = %kind, exit_code = code, bytes = output.len(), "Action script finished");
                Ok(truncate_output(&output))
            }
            Ok(Err(e)) => Err(ActionError::ExecutionFailed {
                action: kind.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => {
                let _ = child.kill().await;
                warn!(action = %kind, ?timeout, "Action script timed out");
                Err(ActionError::Timeout {
                    action: kind.to_string(),
                    timeout,
                })
            }
        }
    }
}

#[async_trait]
impl ActionExecutor for ScriptExecutor {
    async fn execute(&self, request: &ActionRequest) -> Result<String, ActionError> {
        let script = self.script_path(request.kind);
        if !script.is_file() {
            return Err(ActionError::ScriptNotFound {
                path: script.display().to_string(),
            });
        }

        let timeout = self.timeout_for(request.kind);
        debug!(
            request_id = %request.id,
            action = %request.kind,
            script = %script.display(),
            ?timeout,
            "Running action script"
        );
        self.run_script(request.kind, &script, &request.args, timeout)
            .await
    }
}

/// Keep the head and tail of oversized output (UTF-8 safe).
///
/// Result markers are printed last, so the tail must survive.
fn truncate_output(s: &str) -> String {
    if s.len() <= MAX_OUTPUT_SIZE {
        return s.to_string();
    }
    let half = MAX_OUTPUT_SIZE / 2;
    let head_end = floor_char_boundary(s, half);
    let tail_start = floor_char_boundary(s, s.len() - half);
    format!(
        "{}\n\n... [truncated {} bytes] ...\n\n{}",
        &s[..head_end],
        tail_start - head_end,
        &s[tail_start..]
    )
}

/// Largest byte index <= `i` on a char boundary.
fn floor_char_boundary(s: &str, i: usize) -> usize {
    if i >= s.len() {
        return s.len();
    }
    let mut pos = i;
    while pos > 0 && !s.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_script(dir: &Path, kind: ActionKind, body: &str) {
        std::fs::write(dir.join(format!("{}.sh", kind.as_str())), body).unwrap();
    }

    fn executor(dir: &Path) -> ScriptExecutor {
        let config = SkillConfig {
            scripts_dir: dir.to_path_buf(),
            ..SkillConfig::default()
        };
        ScriptExecutor::new(&config).with_interpreter("sh")
    }

    #[tokio::test]
    async fn passes_arguments_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        write_script(
            dir.path(),
            ActionKind::CreatePost,
            "printf '%s\\n' \"$1\" \"$2\" \"$3\"\necho HTTP_STATUS:201\n",
        );

        let request = ActionRequest::new(
            ActionKind::CreatePost,
            vec![
                "general".into(),
                "It's $HOME".into(),
                "a | b; echo injected".into(),
            ],
        );
        let output = executor(dir.path()).execute(&request).await.unwrap();

        assert!(output.contains("It's $HOME"));
        assert!(output.contains("a | b; echo injected"));
        assert!(!output.contains("\ninjected\n"));
        assert!(output.contains("HTTP_STATUS:201"));
    }

    #[tokio::test]
    async fn non_zero_exit_still_returns_output() {
        let dir = tempfile::tempdir().unwrap();
        write_script(
            dir.path(),
            ActionKind::CheckStatus,
            "echo 'MOLTBOOK_API_KEY is not set' >&2\nexit 1\n",
        );

        let output = executor(dir.path())
            .execute(&ActionRequest::check_status())
            .await
            .unwrap();
        assert!(output.contains("MOLTBOOK_API_KEY is not set"));
    }

    #[tokio::test]
    async fn merges_stdout_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        write_script(
            dir.path(),
            ActionKind::CheckStatus,
            "echo out\necho err >&2\n",
        );

        let output = executor(dir.path())
            .execute(&ActionRequest::check_status())
            .await
            .unwrap();
        assert!(output.contains("out"));
        assert!(output.contains("err"));
    }

    #[tokio::test]
    async fn missing_script() {
        let dir = tempfile::tempdir().unwrap();
        let result = executor(dir.path())
            .execute(&ActionRequest::check_status())
            .await;
        assert!(matches!(result, Err(ActionError::ScriptNotFound { .. })));
    }

    #[tokio::test]
    async fn missing_interpreter() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), ActionKind::CheckStatus, "echo hi\n");
        let result = executor(dir.path())
            .with_interpreter("definitely-not-a-real-interpreter")
            .execute(&ActionRequest::check_status())
            .await;
        assert!(matches!(result, Err(ActionError::SpawnFailed { .. })));
    }

    #[tokio::test]
    async fn script_timeout() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), ActionKind::SetupOwnerEmail, "sleep 10\n");

        let result = executor(dir.path())
            .with_timeout(Duration::from_millis(100))
            .execute(&ActionRequest::setup_owner_email("owner@example.com"))
            .await;

        match result {
            Err(e @ ActionError::Timeout { .. }) => assert!(e.to_string().contains("timeout")),
            other => panic!("Expected Timeout, got {:?}", other),
        }
    }

    #[test]
    fn script_paths() {
        let exec = executor(Path::new("/opt/skill/scripts"));
        assert_eq!(
            exec.script_path(ActionKind::SetupOwnerEmail),
            PathBuf::from("/opt/skill/scripts/setup_owner_email.sh")
        );
    }

    #[test]
    fn truncate_output_short() {
        assert_eq!(truncate_output("short"), "short");
    }

    #[test]
    fn truncate_output_long() {
        let s = "é".repeat(MAX_OUTPUT_SIZE);
        let result = truncate_output(&s);
        assert!(result.contains("[truncated"));
        assert!(result.len() <= MAX_OUTPUT_SIZE + 64);
    }

    #[test]
    fn truncate_output_keeps_trailing_marker() {
        let s = format!("{}\nHTTP_STATUS:201\n", "x".repeat(70_000));
        let result = truncate_output(&s);
        assert!(result.starts_with("xxxx"));
        assert!(result.contains("[truncated"));
        assert!(result.ends_with("HTTP_STATUS:201\n"));
    }
}
