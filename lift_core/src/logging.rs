//! Tracing setup shared by every replog binary.
//!
//! Diagnostics go to stderr; the interactive session loop owns stdout and
//! draws the board there, so the two never interleave.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging for a binary, warnings and up by default
///
/// `RUST_LOG` overrides the default filter as usual.
pub fn init() {
    init_with_level("warn")
}

/// Initialize logging with a specific default filter
///
/// Accepts anything `EnvFilter` does, e.g. "debug" or "lift_core=debug";
/// `RUST_LOG` still wins when set.
pub fn init_with_level(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}
