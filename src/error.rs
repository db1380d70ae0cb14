//! Error types for proc-leash.

use std::time::Duration;

use thiserror::Error;

/// Main error type for proc-leash operations.
///
/// Display strings for the abnormal paths carry the full command line so
/// that callers (and the tolerant failure policy, which returns these
/// strings as payloads) can identify the offending command.
#[derive(Error, Debug)]
pub enum ProcLeashError {
    /// The command sequence was empty; there is nothing to spawn.
    #[error("empty command")]
    EmptyCommand,

    /// The subprocess could not be started.
    #[error("process failed to run: {command}")]
    Spawn {
        /// Space-joined command line.
        command: String,
        /// Underlying I/O error from the spawn attempt.
        #[source]
        source: std::io::Error,
    },

    /// The subprocess did not finish before the deadline.
    #[error("process failed to exit: {command}")]
    Timeout {
        /// Space-joined command line.
        command: String,
        /// The deadline that was exceeded.
        limit: Duration,
    },

    /// The wait on the output read task was itself interrupted.
    #[error("process failed to exit: {command}")]
    WaitInterrupted {
        /// Space-joined command line.
        command: String,
    },

    /// The shared one-slot worker was shut down while a call was queued.
    #[error("runner worker unavailable")]
    WorkerUnavailable,
}

/// Convenience Result type for proc-leash operations.
pub type Result<T> = std::result::Result<T, ProcLeashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ProcLeashError::Spawn {
            command: "no-such-binary --flag".into(),
            source: io_err,
        };
        assert!(err.to_string().contains("failed to run"));
        assert!(err.to_string().contains("no-such-binary --flag"));
    }

    #[test]
    fn test_timeout_display() {
        let err = ProcLeashError::Timeout {
            command: "sleep 999".into(),
            limit: Duration::from_millis(100),
        };
        assert!(err.to_string().contains("failed to exit"));
        assert!(err.to_string().contains("sleep 999"));
    }

    #[test]
    fn test_wait_interrupted_display() {
        let err = ProcLeashError::WaitInterrupted {
            command: "cat /dev/zero".into(),
        };
        assert!(err.to_string().contains("failed to exit"));
        assert!(err.to_string().contains("cat /dev/zero"));
    }

    #[test]
    fn test_spawn_source_preserved() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ProcLeashError::Spawn {
            command: "restricted".into(),
            source: io_err,
        };
        let source = std::error::Error::source(&err);
        assert!(source.is_some());
    }

    #[test]
    fn test_empty_command_display() {
        let err = ProcLeashError::EmptyCommand;
        assert!(err.to_string().contains("empty"));
    }
}
