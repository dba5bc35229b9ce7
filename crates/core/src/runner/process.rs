//! Real subprocess runner.
//!
//! Spawns the command in its own process group, captures stdout/stderr
//! incrementally into shared buffers, and enforces the command timeout. On
//! timeout the whole process group is killed so that pipelines started by a
//! script die with it, and whatever output was captured so far is returned.

use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use super::{CommandOutput, CommandRunner, CommandSpec, RunOutcome};

/// Maximum stdout or stderr size captured per stream (1 MiB). Anything past
/// this is read and discarded so the child never blocks on a full pipe.
const MAX_OUTPUT_BYTES: usize = 1024 * 1024;

/// How long reader tasks may keep draining pipes after the child exits or
/// is killed. A detached grandchild can hold a pipe open indefinitely.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

type SharedBuf = Arc<Mutex<Vec<u8>>>;

/// [`CommandRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> RunOutcome {
        let start = Instant::now();

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        for (key, value) in &spec.env_vars {
            cmd.env(key, value);
        }
        if let Some(dir) = &spec.working_directory {
            cmd.current_dir(dir);
        }
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return RunOutcome::Failure {
                    diagnostic: format!("Failed to start `{spec}`: {e}"),
                    output: CommandOutput {
                        duration_ms: elapsed_ms(start),
                        ..Default::default()
                    },
                };
            }
        };

        let stdout_buf = SharedBuf::default();
        let stderr_buf = SharedBuf::default();
        let readers = [
            tokio::spawn(capture(child.stdout.take(), Arc::clone(&stdout_buf))),
            tokio::spawn(capture(child.stderr.take(), Arc::clone(&stderr_buf))),
        ];

        match tokio::time::timeout(spec.timeout, child.wait()).await {
            Ok(Ok(status)) => {
                drain(readers).await;
                let output = snapshot(&stdout_buf, &stderr_buf, status.code(), start);

                if status.success() {
                    RunOutcome::Success(output)
                } else {
                    let code = status
                        .code()
                        .map_or_else(|| "a signal".to_string(), |c| format!("code {c}"));
                    RunOutcome::Failure {
                        diagnostic: format!("`{spec}` exited with {code}"),
                        output,
                    }
                }
            }
            Ok(Err(e)) => {
                kill_process_group(&mut child).await;
                drain(readers).await;
                RunOutcome::Failure {
                    diagnostic: format!("Failed waiting for `{spec}`: {e}"),
                    output: snapshot(&stdout_buf, &stderr_buf, None, start),
                }
            }
            Err(_elapsed) => {
                kill_process_group(&mut child).await;
                drain(readers).await;
                RunOutcome::TimedOut {
                    timeout: spec.timeout,
                    output: snapshot(&stdout_buf, &stderr_buf, None, start),
                }
            }
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Read a stream to EOF, appending into `buf` up to [`MAX_OUTPUT_BYTES`].
async fn capture<R: AsyncRead + Unpin>(handle: Option<R>, buf: SharedBuf) {
    let Some(mut reader) = handle else {
        return;
    };
    let mut chunk = [0u8; 8192];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let mut guard = buf.lock().unwrap_or_else(|e| e.into_inner());
                let room = MAX_OUTPUT_BYTES.saturating_sub(guard.len());
                guard.extend_from_slice(&chunk[..n.min(room)]);
            }
        }
    }
}

/// Give reader tasks [`DRAIN_GRACE`] to finish, then abort the stragglers.
async fn drain(readers: [JoinHandle<()>; 2]) {
    let aborts = readers.each_ref().map(JoinHandle::abort_handle);
    let _ = tokio::time::timeout(DRAIN_GRACE, async {
        for reader in readers {
            let _ = reader.await;
        }
    })
    .await;
    for abort in aborts {
        abort.abort();
    }
}

fn snapshot(
    stdout: &SharedBuf,
    stderr: &SharedBuf,
    exit_code: Option<i32>,
    start: Instant,
) -> CommandOutput {
    let read = |buf: &SharedBuf| {
        let guard = buf.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&guard).into_owned()
    };
    CommandOutput {
        stdout: read(stdout),
        stderr: read(stderr),
        exit_code,
        duration_ms: elapsed_ms(start),
    }
}

/// SIGKILL the child's process group, then reap the child itself.
async fn kill_process_group(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        // Safety: kill(2) has no memory-safety preconditions. The child was
        // spawned with `process_group(0)`, so its pid is also its pgid.
        unsafe {
            libc::kill(-(pid as libc::pid_t), libc::SIGKILL);
        }
    }
    let _ = child.kill().await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
