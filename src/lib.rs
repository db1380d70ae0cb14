//! # proc-leash
//!
//! Timeout-bounded external command execution with guaranteed cleanup.
//!
//! This crate runs one external command per call, captures its merged
//! stdout+stderr output as a newline-joined string, and enforces a hard
//! deadline: a subprocess that does not finish in time is forcibly
//! terminated before the call returns. It is not a process pool or a job
//! scheduler; each call owns exactly one subprocess for its duration.
//!
//! ## Features
//!
//! - **Merged capture**: stdout and stderr are drained concurrently into
//!   one stream, lines joined in arrival order
//! - **Hard deadline**: the caller waits with a timeout while a
//!   background task reads output under a cancellation token
//! - **Guaranteed cleanup**: no subprocess outlives the call, on any path
//! - **Explicit policies**: strict (structured errors) or tolerant
//!   (diagnostic strings) failure handling, per-call or shared worker
//!
//! ## Quick Start
//!
//! ```no_run
//! use proc_leash::{Command, CommandRunner};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> proc_leash::Result<()> {
//!     // Initialize logging
//!     proc_leash::logging::try_init().ok();
//!
//!     // One runner value, constructed up front and passed to callers
//!     let runner = CommandRunner::new();
//!
//!     let output = runner.execute(&Command::new(["echo", "hello"])).await?;
//!     assert_eq!(output, "hello");
//!
//!     // A command with its own deadline
//!     let cmd = Command::new(["sleep", "999"]).timeout(Duration::from_millis(100));
//!     assert!(runner.execute(&cmd).await.is_err());
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runner;

// Re-export commonly used types
pub use config::Config;
pub use error::{ProcLeashError, Result};
pub use runner::{
    execute_simple, execute_with_timeout, CapturedOutput, Command, CommandRunner, FailurePolicy,
    WorkerScope, DEFAULT_TIMEOUT, LONG_RUNNING_TIMEOUT,
};
