//! Timeout-bounded command execution.
//!
//! This module provides the command runner:
//! - Merged stdout+stderr capture, lines joined in arrival order
//! - Hard deadline with cooperative cancellation of the read task
//! - Guaranteed forced termination of a child that outlives the call
//!
//! # Example
//!
//! ```no_run
//! use proc_leash::runner::{execute_simple, execute_with_timeout};
//! use std::time::Duration;
//!
//! # async fn demo() -> proc_leash::Result<()> {
//! let output = execute_simple(["echo", "hello"]).await?;
//! assert_eq!(output, "hello");
//!
//! // Bound a slow command with an explicit deadline.
//! let output = execute_with_timeout(["uname", "-a"], Duration::from_secs(5)).await?;
//! # Ok(())
//! # }
//! ```

mod command;
mod executor;
mod output;

pub use command::Command;
pub use executor::{
    execute_simple, execute_with_timeout, CommandRunner, FailurePolicy, WorkerScope,
    DEFAULT_TIMEOUT, LONG_RUNNING_TIMEOUT,
};
pub use output::CapturedOutput;
