//! Logging initialization.
//!
//! Diagnostics go to the tracing error channel: forced terminations,
//! timeouts, and wait failures are reported here whichever failure
//! policy is active.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither `RUST_LOG` nor a configured level applies.
const DEFAULT_FILTER: &str = "proc_leash=info";

/// Initialize the logging system.
///
/// Uses the `RUST_LOG` environment variable for filtering, falling back
/// to `proc_leash=info`.
///
/// # Panics
///
/// Panics if called more than once, or if another tracing subscriber
/// has already been set.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter).expect("logging already initialized");
}

/// Try to initialize the logging system.
///
/// Returns `Err` if logging has already been initialized.
pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter)
}

/// Try to initialize with an explicit filter directive, typically the
/// configured log level (see [`crate::Config::log_filter`]).
pub fn try_init_with_filter(
    directive: &str,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter)
}

fn install(filter: EnvFilter) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_init_twice_does_not_panic() {
        // Whichever call runs first wins; the second must fail cleanly
        // rather than panic.
        let _ = try_init();
        let _ = try_init();
    }

    #[test]
    fn test_try_init_with_filter_accepts_level() {
        // May fail if another test initialized logging first; the point
        // is that a plain level directive parses.
        let _ = try_init_with_filter("debug");
    }

    #[test]
    fn test_emit_does_not_panic() {
        let _ = try_init();

        tracing::info!("test info message");
        tracing::error!("test error message");
    }
}
