//! Timeout-bounded command execution engine.

use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::command::Command;
use super::output::CapturedOutput;
use crate::error::ProcLeashError;
use crate::Result;

/// Default execution timeout for interactive-scale commands.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout suited to long-running commands (builds, scans).
pub const LONG_RUNNING_TIMEOUT: Duration = Duration::from_secs(300);

/// Channel capacity for merged output lines in flight.
const LINE_CHANNEL_CAPACITY: usize = 64;

/// What the runner does when a command fails to start or to exit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Spawn and timeout failures propagate as structured errors after
    /// being logged.
    #[default]
    Strict,
    /// Every failure is logged and then converted to its descriptive
    /// message, returned as a normal payload. Callers never see an `Err`
    /// but must tolerate a diagnostic string as the output.
    Tolerant,
}

/// Lifecycle of the one-slot worker that drains subprocess output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkerScope {
    /// A fresh read task per call, disposed when the call returns.
    /// Concurrent calls never queue behind each other; each call pays
    /// the task setup cost.
    #[default]
    PerCall,
    /// One shared slot reused for the lifetime of the runner. Concurrent
    /// calls serialize behind a single permit.
    Shared,
}

/// Runs external commands with a hard deadline and guaranteed cleanup.
///
/// One runner value is constructed explicitly and passed to callers;
/// there is no process-wide instance. Each [`execute`](Self::execute)
/// call owns exactly one subprocess, which is terminated (normally or
/// forcibly) before the call returns.
#[derive(Debug)]
pub struct CommandRunner {
    default_timeout: Duration,
    policy: FailurePolicy,
    slot: Option<Semaphore>,
}

impl CommandRunner {
    /// Create a runner with the default timeout, strict failure policy,
    /// and per-call worker scope.
    pub fn new() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
            policy: FailurePolicy::default(),
            slot: None,
        }
    }

    /// Set the timeout applied to commands without their own override.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Set the failure policy.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the worker scope.
    pub fn with_worker_scope(mut self, scope: WorkerScope) -> Self {
        self.slot = match scope {
            WorkerScope::PerCall => None,
            WorkerScope::Shared => Some(Semaphore::new(1)),
        };
        self
    }

    /// The timeout applied to commands without their own override.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// The configured failure policy.
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// The configured worker scope.
    pub fn worker_scope(&self) -> WorkerScope {
        if self.slot.is_some() {
            WorkerScope::Shared
        } else {
            WorkerScope::PerCall
        }
    }

    /// Execute a command, capturing its merged stdout+stderr output.
    ///
    /// Returns the captured output with lines joined by `\n` (no leading
    /// or trailing newline). Failures to read the output stream are
    /// absorbed into a descriptive fallback string. Spawn failures and
    /// deadline overruns are logged and then either propagated
    /// ([`FailurePolicy::Strict`]) or returned as their descriptive
    /// message ([`FailurePolicy::Tolerant`]).
    ///
    /// Whatever the outcome, no subprocess outlives this call: a child
    /// still alive after the bounded wait is forcibly killed and reaped.
    pub async fn execute(&self, command: &Command) -> Result<String> {
        let _permit = match &self.slot {
            Some(slot) => Some(
                slot.acquire()
                    .await
                    .map_err(|_| ProcLeashError::WorkerUnavailable)?,
            ),
            None => None,
        };

        let limit = command.timeout_override().unwrap_or(self.default_timeout);
        match self.run_bounded(command, limit).await {
            Ok(text) => Ok(text),
            Err(err) => match self.policy {
                FailurePolicy::Strict => Err(err),
                FailurePolicy::Tolerant => Ok(err.to_string()),
            },
        }
    }

    async fn run_bounded(&self, command: &Command, limit: Duration) -> Result<String> {
        let program = command.program().ok_or(ProcLeashError::EmptyCommand)?;
        let line = command.display_line();

        let mut child = tokio::process::Command::new(program)
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| {
                error!(command = %line, error = %source, "process failed to run");
                ProcLeashError::Spawn {
                    command: line.clone(),
                    source,
                }
            })?;

        debug!(command = %line, pid = ?child.id(), "process spawned");

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let cancel = CancellationToken::new();
        let reader = tokio::spawn(drain_merged(
            stdout,
            stderr,
            cancel.child_token(),
            line.clone(),
        ));

        // The deadline bounds both the output drain and the wait for the
        // exit status. Expiry only unblocks this caller; termination of a
        // still-running child happens in the cleanup step below.
        let bounded = tokio::time::timeout(limit, async {
            let text = match reader.await {
                Ok(text) => text,
                Err(err) => {
                    error!(command = %line, error = %err, "wait on read task interrupted");
                    return Err(ProcLeashError::WaitInterrupted {
                        command: line.clone(),
                    });
                }
            };
            match child.wait().await {
                Ok(status) => {
                    debug!(command = %line, ?status, "process exited");
                    Ok(text)
                }
                Err(err) => {
                    warn!(command = %line, error = %err, "wait on process failed");
                    Ok(format!("command could not be executed: {line}"))
                }
            }
        })
        .await;

        // Cleanup runs on every path: stop the read task, then kill and
        // reap the child if it is still alive.
        cancel.cancel();
        if !matches!(child.try_wait(), Ok(Some(_))) {
            error!(command = %line, "forcibly stopping process");
            if let Err(err) = child.start_kill() {
                warn!(command = %line, error = %err, "kill failed");
            }
            let _ = child.wait().await;
        }

        match bounded {
            Ok(result) => result,
            Err(_elapsed) => {
                error!(
                    command = %line,
                    timeout_ms = limit.as_millis() as u64,
                    "process failed to exit"
                );
                Err(ProcLeashError::Timeout {
                    command: line,
                    limit,
                })
            }
        }
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Drain both pipes of a child into one newline-joined string, lines in
/// arrival order. Read failures are absorbed into a fallback message
/// identifying the command; they never surface as errors.
async fn drain_merged(
    stdout: Option<tokio::process::ChildStdout>,
    stderr: Option<tokio::process::ChildStderr>,
    cancel: CancellationToken,
    command_line: String,
) -> String {
    let (tx, mut rx) = mpsc::channel::<std::io::Result<String>>(LINE_CHANNEL_CAPACITY);

    if let Some(out) = stdout {
        tokio::spawn(forward_lines(out, tx.clone()));
    }
    match stderr {
        Some(err) => {
            tokio::spawn(forward_lines(err, tx));
        }
        // The forwarders must hold the only senders so that `rx` sees
        // EOF once both pipes close.
        None => drop(tx),
    }

    let mut captured = CapturedOutput::new();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            next = rx.recv() => match next {
                Some(Ok(line)) => captured.push_line(&line),
                Some(Err(err)) => {
                    warn!(command = %command_line, error = %err, "reading process output failed");
                    return format!("command could not be executed: {command_line}");
                }
                None => break,
            },
        }
    }

    captured.into_string()
}

/// Forward lines from one pipe into the merge channel until EOF, a read
/// error, or the receiver going away.
async fn forward_lines<R>(reader: R, tx: mpsc::Sender<std::io::Result<String>>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if tx.send(Ok(line)).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(err) => {
                let _ = tx.send(Err(err)).await;
                break;
            }
        }
    }
}

/// One-shot execution with the default runner configuration.
pub async fn execute_simple<I, S>(argv: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    CommandRunner::new().execute(&Command::new(argv)).await
}

/// One-shot execution with an explicit timeout.
pub async fn execute_with_timeout<I, S>(argv: I, timeout: Duration) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    CommandRunner::new()
        .execute(&Command::new(argv).timeout(timeout))
        .await
}
