//! Diagnostic tracing for the interview engine.
//!
//! Tracing output goes to stderr and is never part of an interview: the
//! transcript lives on the session and completed interviews go to the
//! results store, both unaffected by `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor `--verbose` is given.
pub const DEFAULT_FILTER: &str = "warn";

/// Filter used by `--verbose`.
pub const VERBOSE_FILTER: &str = "warn,interview=debug";

/// Initialize the stderr tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `fallback` is used.
///
/// # Example
/// ```bash
/// RUST_LOG=interview=debug cargo run -- chat
/// ```
pub fn init(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // The chat command owns stdout, so diagnostics stay on stderr.
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
