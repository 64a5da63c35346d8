//! # Process Execution
//!
//! The seam between `CommandRunner` and the operating system. An executor
//! takes a command line and a working directory, runs it, and streams
//! `ProcessEvent`s into a channel as output arrives:
//!
//! ```text
//! Stdout("...") / Stderr("...")   zero or more, in arrival order
//! Exited(Some(code) | None)       exactly once, last
//! ```
//!
//! Output is read until the shell exits plus a short grace period. Pipes
//! still held open by background jobs after that are no longer read.
//!
//! If the process can't be started at all, `execute` returns
//! `EditorError::Spawn` and sends nothing.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc::Sender;

use crate::core::error::EditorError;

/// How long output pipes may stay open once the shell has exited.
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_millis(250);

/// A command ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    pub line: String,
    pub cwd: PathBuf,
}

/// Output and lifecycle events from a running process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    Stdout(String),
    Stderr(String),
    /// Exit status code; `None` when killed by a signal.
    Exited(Option<i32>),
    /// The process never started.
    SpawnFailed(String),
}

#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Returns the name of the executor (for logs).
    fn name(&self) -> &str;

    /// Run `request` to completion, streaming events to `sender`.
    async fn execute(
        &self,
        request: ExecRequest,
        sender: Sender<ProcessEvent>,
    ) -> Result<(), EditorError>;
}

/// Runs command lines through a POSIX shell (`<shell> -c <line>`), so
/// pipes, globs and quoting behave as the user expects.
pub struct ShellExecutor {
    shell: String,
}

impl ShellExecutor {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

#[async_trait]
impl CommandExecutor for ShellExecutor {
    fn name(&self) -> &str {
        &self.shell
    }

    async fn execute(
        &self,
        request: ExecRequest,
        sender: Sender<ProcessEvent>,
    ) -> Result<(), EditorError> {
        info!("Running `{}` in {}", request.line, request.cwd.display());

        let mut child = Command::new(&self.shell)
            .arg("-c")
            .arg(&request.line)
            .current_dir(&request.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EditorError::Spawn(format!("{}: {e}", self.shell)))?;

        let stdout = child.stdout.take().map(|out| {
            tokio::spawn(forward_lines(out, sender.clone(), ProcessEvent::Stdout))
        });
        let stderr = child.stderr.take().map(|err| {
            tokio::spawn(forward_lines(err, sender.clone(), ProcessEvent::Stderr))
        });

        let code = match child.wait().await {
            Ok(status) => status.code(),
            Err(e) => {
                warn!("Failed to wait for `{}`: {e}", request.line);
                None
            }
        };
        debug!("`{}` exited with {:?}", request.line, code);

        // A background job started by the line can hold the pipes open long
        // after the shell is gone. Give the readers a short grace period,
        // then stop them. Either way they are finished before `Exited`.
        for mut reader in [stdout, stderr].into_iter().flatten() {
            match tokio::time::timeout(OUTPUT_DRAIN_GRACE, &mut reader).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Output reader task failed: {e}"),
                Err(_) => {
                    debug!("Output of `{}` still open after exit; detaching", request.line);
                    reader.abort();
                    let _ = reader.await;
                }
            }
        }

        if sender.send(ProcessEvent::Exited(code)).await.is_err() {
            warn!("Failed to send exit status: receiver dropped");
        }
        Ok(())
    }
}

/// Read `reader` line by line, sending each line (without its newline)
/// as soon as it arrives. Invalid UTF-8 is replaced, not rejected.
async fn forward_lines<R>(reader: R, sender: Sender<ProcessEvent>, wrap: fn(String) -> ProcessEvent)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut raw = Vec::new();
    loop {
        raw.clear();
        match reader.read_until(b'\n', &mut raw).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&raw)
                    .trim_end_matches(['\n', '\r'])
                    .to_string();
                if sender.send(wrap(line)).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!("Error reading process output: {e}");
                break;
            }
        }
    }
}
