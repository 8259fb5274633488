//! Bounded execution of a single untrusted child process.
//!
//! The sandbox spawns the child, feeds it line-oriented stdin, waits for it
//! under a wall-clock deadline, and reports elapsed time plus a coarse
//! memory estimate. It does not provide OS-level isolation: a production
//! deployment must additionally run the child inside a namespace/cgroup
//! sandbox with a hard per-process memory cap instead of the host-wide
//! delta measured here.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{EngineError, Result};

/// Command shape for one child process.
#[derive(Debug, Clone)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

/// How the child finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SandboxOutcome {
    /// Exited normally with status zero.
    Completed,
    /// Still running when the wall-clock deadline passed; forcibly killed.
    TimedOut,
    /// Exited with a non-zero status or was killed by a signal.
    Crashed { exit_code: Option<i32> },
}

/// Raw result of one bounded execution.
#[derive(Debug, Clone)]
pub struct SandboxReport {
    pub stdout: String,
    pub stderr: String,
    /// Wall-clock time around the wait, in milliseconds.
    pub elapsed_ms: f64,
    /// Host-wide used-memory delta across the run, in megabytes. Coarse
    /// approximation; 0 when the host does not expose the numbers.
    pub memory_delta_mb: f64,
    pub outcome: SandboxOutcome,
}

/// Run `spec` to completion or until `wall_limit` passes.
///
/// The input is re-fed as one whitespace-delimited token per line (the
/// grading convention for line-oriented stdin) and the pipe is closed
/// afterwards, so the child never blocks on EOF. On timeout the child is
/// killed, never left to terminate itself; dropping the returned future
/// mid-wait kills it too, which makes this wait the caller's cancellation
/// point.
pub async fn execute(spec: &ProcessSpec, input: &str, wall_limit: Duration) -> Result<SandboxReport> {
    let memory_before = host_used_memory_mb();

    let mut child = Command::new(&spec.program)
        .args(&spec.args)
        .current_dir(&spec.cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| EngineError::Spawn {
            program: spec.program.clone(),
            source,
        })?;

    // Feeding stdin happens inside the deadline too: a child that never
    // reads its input must not stall the engine past the limit.
    let feed = line_oriented(input);
    let started = Instant::now();
    let waited = timeout(wall_limit, async move {
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(feed.as_bytes()).await {
                Ok(()) => {
                    let _ = stdin.shutdown().await;
                }
                // The child exited without reading its input; its status
                // tells the rest of the story.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Err(e) => return Err(e),
            }
        }
        child.wait_with_output().await
    })
    .await;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    let memory_delta_mb = memory_delta(memory_before);

    match waited {
        Ok(Ok(output)) => {
            let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            let outcome = if output.status.success() {
                SandboxOutcome::Completed
            } else {
                debug!(exit_code = ?output.status.code(), "Child exited abnormally");
                SandboxOutcome::Crashed {
                    exit_code: output.status.code(),
                }
            };
            Ok(SandboxReport {
                stdout,
                stderr,
                elapsed_ms,
                memory_delta_mb,
                outcome,
            })
        }
        Ok(Err(e)) => Err(e.into()),
        // Deadline passed: the dropped wait future kills the child via
        // kill_on_drop, and the runtime reaps it. No zombie survives.
        Err(_) => Ok(SandboxReport {
            stdout: String::new(),
            stderr: String::new(),
            elapsed_ms,
            memory_delta_mb,
            outcome: SandboxOutcome::TimedOut,
        }),
    }
}

/// One whitespace-delimited token per line, closed by a final newline.
fn line_oriented(input: &str) -> String {
    let mut feed = input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("\n");
    if !feed.is_empty() {
        feed.push('\n');
    }
    feed
}

fn memory_delta(before: Option<f64>) -> f64 {
    match (before, host_used_memory_mb()) {
        (Some(before), Some(after)) => (after - before).max(0.0),
        _ => {
            warn!("Host memory usage unavailable, reporting zero delta");
            0.0
        }
    }
}

/// Host-wide used memory in megabytes (MemTotal - MemAvailable).
#[cfg(target_os = "linux")]
fn host_used_memory_mb() -> Option<f64> {
    let meminfo = std::fs::read_to_string("/proc/meminfo").ok()?;
    let mut total = None;
    let mut available = None;
    for line in meminfo.lines() {
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            total = parse_meminfo_kb(rest);
        } else if let Some(rest) = line.strip_prefix("MemAvailable:") {
            available = parse_meminfo_kb(rest);
        }
    }
    Some((total? - available?) / 1024.0)
}

#[cfg(not(target_os = "linux"))]
fn host_used_memory_mb() -> Option<f64> {
    None
}

#[cfg(target_os = "linux")]
fn parse_meminfo_kb(rest: &str) -> Option<f64> {
    rest.split_whitespace().next()?.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn sh(script: &str) -> ProcessSpec {
        ProcessSpec {
            program: "sh".into(),
            args: vec!["-c".into(), script.into()],
            cwd: std::env::temp_dir(),
        }
    }

    #[test]
    fn test_line_oriented_tokens() {
        assert_eq!(line_oriented("2 3"), "2\n3\n");
        assert_eq!(line_oriented("  a\tb\nc  "), "a\nb\nc\n");
        assert_eq!(line_oriented(""), "");
    }

    #[tokio::test]
    async fn test_completed_run_captures_stdout() {
        let report = execute(&sh("cat"), "2 3", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(report.outcome, SandboxOutcome::Completed);
        assert_eq!(report.stdout, "2\n3\n");
        assert!(report.elapsed_ms >= 0.0);
    }

    #[tokio::test]
    async fn test_child_never_blocks_on_eof() {
        // `wc -l` only terminates once stdin is closed.
        let report = execute(&sh("wc -l"), "a b c", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(report.outcome, SandboxOutcome::Completed);
        assert_eq!(report.stdout.trim(), "3");
    }

    #[tokio::test]
    #[serial]
    async fn test_timeout_kills_the_child() {
        let started = Instant::now();
        let report = execute(&sh("sleep 30"), "", Duration::from_millis(300))
            .await
            .unwrap();
        assert_eq!(report.outcome, SandboxOutcome::TimedOut);
        // Must come back shortly after the deadline, not after 30s.
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_crash_reports_exit_code_and_stderr() {
        let report = execute(
            &sh("echo boom >&2; exit 3"),
            "",
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(
            report.outcome,
            SandboxOutcome::Crashed { exit_code: Some(3) }
        );
        assert!(report.stderr.contains("boom"));
    }

    #[tokio::test]
    async fn test_missing_program_is_a_spawn_error() {
        let spec = ProcessSpec {
            program: "gavel-no-such-binary".into(),
            args: vec![],
            cwd: std::env::temp_dir(),
        };
        let err = execute(&spec, "", Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, EngineError::Spawn { .. }));
    }
}
