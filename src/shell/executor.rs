//! Execution engine: runs approved commands through the host shell.
//!
//! Each command runs as `<shell> -c <command>` in its own process group with
//! stdout/stderr captured. On a terminal the group is given the terminal
//! foreground and inherits stdin; otherwise stdin is detached. Execution is
//! time-bounded; on timeout or Ctrl-C the whole process group is killed and
//! the shell reaped. Every path returns an [`ExecutionResult`]; nothing here
//! returns `Err`.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::process_group::{self, TerminalForeground};
use crate::error::ExecutionError;
use crate::utils::interrupt::interrupted;

pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 1024;

#[derive(Clone, Debug)]
pub struct ExecutionConfig {
    /// Shell used to interpret the command (`<shell> -c <command>`).
    pub shell: String,
    /// Wall-clock limit for one command.
    pub timeout: Duration,
    /// Max bytes kept per captured stream.
    pub max_output_bytes: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

/// `$SHELL` when set and non-blank, otherwise `/bin/sh`.
pub fn default_shell() -> String {
    std::env::var("SHELL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "/bin/sh".to_string())
}

/// How an execution ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    Exited(i32),
    /// Killed by a signal the engine did not send (unix only).
    Signaled(i32),
    Failed(ExecutionError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub succeeded: bool,
    pub stdout: String,
    pub stderr: String,
    pub termination: Termination,
}

impl ExecutionResult {
    fn completed(status: ExitStatus, stdout: String, stderr: String) -> Self {
        let termination = match status.code() {
            Some(code) => Termination::Exited(code),
            None => signal_of(status),
        };
        Self {
            succeeded: status.success(),
            stdout,
            stderr,
            termination,
        }
    }

    fn failed(error: ExecutionError) -> Self {
        Self {
            succeeded: false,
            stdout: String::new(),
            stderr: String::new(),
            termination: Termination::Failed(error),
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self.termination {
            Termination::Exited(code) => Some(code),
            _ => None,
        }
    }

    /// Human-readable reason for runs that did not reach a normal exit.
    pub fn failure_reason(&self) -> Option<String> {
        match &self.termination {
            Termination::Exited(_) => None,
            Termination::Signaled(sig) => Some(format!("Command terminated by signal {}", sig)),
            Termination::Failed(err) => Some(err.to_string()),
        }
    }

    pub fn timed_out(&self) -> bool {
        matches!(
            self.termination,
            Termination::Failed(ExecutionError::Timeout { .. })
        )
    }
}

#[cfg(unix)]
fn signal_of(status: ExitStatus) -> Termination {
    use std::os::unix::process::ExitStatusExt;
    match status.signal() {
        Some(sig) => Termination::Signaled(sig),
        None => Termination::Failed(ExecutionError::Unexpected(format!(
            "process ended without exit code: {}",
            status
        ))),
    }
}

#[cfg(not(unix))]
fn signal_of(status: ExitStatus) -> Termination {
    Termination::Failed(ExecutionError::Unexpected(format!(
        "process ended without exit code: {}",
        status
    )))
}

pub struct ExecutionEngine {
    config: ExecutionConfig,
}

impl ExecutionEngine {
    pub fn new(config: ExecutionConfig) -> Self {
        Self { config }
    }

    /// Run one approved command to completion, timeout, or interrupt.
    pub async fn execute(&self, command: &str) -> ExecutionResult {
        let cfg = &self.config;
        let interactive = process_group::stdin_is_terminal();
        info!("Executing via {} (terminal: {}): {}", cfg.shell, interactive, command);

        let mut c = Command::new(&cfg.shell);
        c.arg("-c").arg(command);
        c.stdin(if interactive { Stdio::inherit() } else { Stdio::null() });
        c.stdout(Stdio::piped());
        c.stderr(Stdio::piped());
        c.kill_on_drop(true);
        #[cfg(unix)]
        c.process_group(0);

        let mut child = match c.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to spawn {}: {}", cfg.shell, e);
                return ExecutionResult::failed(ExecutionError::Launch {
                    shell: cfg.shell.clone(),
                    reason: e.to_string(),
                });
            }
        };
        let pid = child.id();

        // Held until the command is reaped.
        let foreground = match pid.filter(|_| interactive) {
            Some(pid) => TerminalForeground::hand_to(pid).unwrap_or_else(|e| {
                warn!("Could not give the terminal to the command: {}", e);
                None
            }),
            None => None,
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let cap = cfg.max_output_bytes;

        let outcome = tokio::select! {
            res = timeout(cfg.timeout, async {
                tokio::try_join!(child.wait(), capture(stdout, cap), capture(stderr, cap))
            }) => Some(res),
            _ = interrupted() => None,
        };

        let result = match outcome {
            Some(Ok(Ok((status, out, err)))) => {
                debug!("Command finished with {}", status);
                ExecutionResult::completed(status, out.into_text(), err.into_text())
            }
            Some(Ok(Err(e))) => {
                terminate(&mut child, pid).await;
                warn!("I/O error while waiting for command: {}", e);
                ExecutionResult::failed(ExecutionError::Unexpected(e.to_string()))
            }
            Some(Err(_elapsed)) => {
                terminate(&mut child, pid).await;
                warn!("Command timed out after {:?}: {}", cfg.timeout, command);
                ExecutionResult::failed(ExecutionError::Timeout { limit: cfg.timeout })
            }
            None => {
                terminate(&mut child, pid).await;
                info!("Command interrupted by user: {}", command);
                ExecutionResult::failed(ExecutionError::Interrupted)
            }
        };

        drop(foreground);
        result
    }
}

/// Kill the command's process group, then kill and reap the shell itself.
async fn terminate(child: &mut Child, pid: Option<u32>) {
    if let Some(pid) = pid {
        if let Err(e) = process_group::kill_process_group(pid) {
            warn!("Failed to kill process group {}: {}", pid, e);
        }
    }
    if let Err(e) = child.kill().await {
        debug!("Child already gone: {}", e);
    }
}

const CHUNK_SIZE: usize = 8 * 1024;

/// What was kept of one output stream.
#[derive(Debug, Default)]
struct Captured {
    kept: Vec<u8>,
    /// Bytes read past the cap and thrown away.
    dropped: usize,
}

impl Captured {
    fn into_text(mut self) -> String {
        if self.dropped == 0 {
            return String::from_utf8_lossy(&self.kept).into_owned();
        }
        // Do not show half of a character cut by the cap.
        let cut = incomplete_tail(&self.kept);
        self.dropped += cut;
        self.kept.truncate(self.kept.len() - cut);

        let mut text = String::from_utf8_lossy(&self.kept).into_owned();
        text.push_str(&format!("\n...(truncated {} bytes)...\n", self.dropped));
        text
    }
}

/// Read `pipe` to EOF keeping at most `cap` bytes. The rest is still drained
/// so the command never blocks on a full pipe.
async fn capture<R: AsyncRead + Unpin>(pipe: Option<R>, cap: usize) -> io::Result<Captured> {
    let mut captured = Captured::default();
    let Some(mut pipe) = pipe else {
        return Ok(captured);
    };

    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        let n = pipe.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        let take = n.min(cap.saturating_sub(captured.kept.len()));
        captured.kept.extend_from_slice(&chunk[..take]);
        captured.dropped += n - take;
    }
    Ok(captured)
}

/// Length of an unfinished UTF-8 sequence at the end of `bytes`.
fn incomplete_tail(bytes: &[u8]) -> usize {
    for back in 1..=bytes.len().min(3) {
        let b = bytes[bytes.len() - back];
        if b & 0xC0 == 0x80 {
            continue;
        }
        let width = match b {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        return if width > back { back } else { 0 };
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(timeout: Duration) -> ExecutionEngine {
        ExecutionEngine::new(ExecutionConfig {
            shell: "/bin/sh".to_string(),
            timeout,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        })
    }

    #[tokio::test]
    async fn test_echo_succeeds() {
        let result = engine(DEFAULT_COMMAND_TIMEOUT).execute("echo hello").await;
        assert!(result.succeeded);
        assert!(result.stdout.contains("hello"));
        assert!(result.stderr.is_empty());
        assert_eq!(result.exit_code(), Some(0));
        assert_eq!(result.failure_reason(), None);
    }

    #[tokio::test]
    async fn test_non_zero_exit_keeps_output() {
        let result = engine(DEFAULT_COMMAND_TIMEOUT)
            .execute("echo out; echo oops >&2; exit 3")
            .await;
        assert!(!result.succeeded);
        assert_eq!(result.exit_code(), Some(3));
        assert!(result.stdout.contains("out"));
        assert!(result.stderr.contains("oops"));
    }

    #[tokio::test]
    async fn test_inherits_working_directory() {
        let result = engine(DEFAULT_COMMAND_TIMEOUT).execute("pwd -P").await;
        let cwd = std::env::current_dir().unwrap().canonicalize().unwrap();
        assert_eq!(result.stdout.trim(), cwd.to_string_lossy());
    }

    #[tokio::test]
    async fn test_timeout_reports_limit() {
        let result = engine(Duration::from_secs(1)).execute("sleep 5").await;
        assert!(!result.succeeded);
        assert!(result.timed_out());
        let reason = result.failure_reason().unwrap();
        assert!(reason.contains("timed out"));
        assert!(reason.contains("1 seconds"));
    }

    #[tokio::test]
    async fn test_timeout_leaves_no_child_running() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("marker");
        // The shell stays the parent of `sleep`, so killing only the shell
        // would let `touch` run later.
        let cmd = format!("sleep 2; touch '{}'", marker.display());

        let result = engine(Duration::from_secs(1)).execute(&cmd).await;
        assert!(result.timed_out());

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert!(!marker.exists(), "grandchild survived the timeout");
    }

    #[tokio::test]
    async fn test_launch_failure_is_reported() {
        let engine = ExecutionEngine::new(ExecutionConfig {
            shell: "/nonexistent/shell".to_string(),
            ..ExecutionConfig::default()
        });
        let result = engine.execute("echo hello").await;
        assert!(!result.succeeded);
        assert!(matches!(
            result.termination,
            Termination::Failed(ExecutionError::Launch { .. })
        ));
        assert!(result.failure_reason().unwrap().contains("/nonexistent/shell"));
    }

    #[tokio::test]
    async fn test_output_is_truncated() {
        let engine = ExecutionEngine::new(ExecutionConfig {
            shell: "/bin/sh".to_string(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
            max_output_bytes: 16,
        });
        let result = engine
            .execute("printf 'abcdefghijklmnopqrstuvwxyz'")
            .await;
        assert!(result.succeeded);
        assert!(result.stdout.starts_with("abcdefghijklmnop"));
        assert!(!result.stdout.contains('q'));
        assert!(result.stdout.contains("truncated 10 bytes"));
    }

    #[tokio::test]
    async fn test_large_output_is_drained_but_not_kept() {
        let engine = ExecutionEngine::new(ExecutionConfig {
            shell: "/bin/sh".to_string(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
            max_output_bytes: 16,
        });
        // Far larger than a pipe buffer: the command only exits if the pipe
        // keeps being read after the cap is reached.
        let result = engine.execute("head -c 4000000 /dev/zero").await;
        assert!(result.succeeded, "{:?}", result.termination);
        assert!(result.stdout.contains("truncated 3999984 bytes"));
        assert!(result.stdout.len() < 64);
    }

    #[tokio::test]
    async fn test_capture_keeps_only_the_cap() {
        let data = vec![b'x'; 100_000];
        let captured = capture(Some(data.as_slice()), 10).await.unwrap();
        assert_eq!(captured.kept.len(), 10);
        assert_eq!(captured.dropped, 99_990);

        let captured = capture(Some(&b"short"[..]), 10).await.unwrap();
        assert_eq!(captured.into_text(), "short");

        let captured = capture(None::<&[u8]>, 10).await.unwrap();
        assert_eq!(captured.into_text(), "");
    }

    #[tokio::test]
    async fn test_cap_does_not_split_characters() {
        let s = "ééééé"; // 2 bytes each
        let text = capture(Some(s.as_bytes()), 3).await.unwrap().into_text();
        assert!(text.starts_with("é\n"));
        assert!(text.contains("truncated 8 bytes"));
        assert!(!text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_incomplete_tail() {
        assert_eq!(incomplete_tail(b"abc"), 0);
        assert_eq!(incomplete_tail("é".as_bytes()), 0);
        assert_eq!(incomplete_tail(&"é".as_bytes()[..1]), 1);
        assert_eq!(incomplete_tail(&"€".as_bytes()[..2]), 2);
        assert_eq!(incomplete_tail(&"😀".as_bytes()[..3]), 3);
        assert_eq!(incomplete_tail(b""), 0);
    }

    #[tokio::test]
    async fn test_terminal_command_runs_in_foreground() {
        // Only meaningful with a terminal on stdin, e.g. under `script`.
        if !process_group::stdin_is_terminal() {
            return;
        }
        let result = engine(Duration::from_secs(5))
            .execute("stty -g < /dev/tty > /dev/null && echo ok")
            .await;
        assert!(!result.timed_out(), "stopped in the background");
        assert!(result.succeeded);
        assert_eq!(result.stdout.trim(), "ok");
    }
}
