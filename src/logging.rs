//! Logging setup for providers.
//!
//! Helpers for wiring up structured logging with the `tracing` ecosystem.
//! Logs go to **stderr** so stdout stays free for whatever protocol the
//! hosting process speaks.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: controls log levels (e.g. `info`, `opslevel_provider=debug`)
//!
//! ```bash
//! RUST_LOG=opslevel_provider=debug terraform apply
//! ```

use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn build_subscriber() -> impl SubscriberInitExt {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(false)
            .with_line_number(false),
    )
}

/// Initialize the default logging subscriber.
///
/// Respects `RUST_LOG`, defaulting to `info`.
///
/// # Panics
///
/// Panics if a global subscriber has already been set; use
/// [`try_init_logging`] where that can happen.
pub fn init_logging() {
    build_subscriber().init();
}

/// Try to initialize logging, returning `false` if a subscriber was already
/// set. Useful in tests, where initialization can race.
pub fn try_init_logging() -> bool {
    build_subscriber().try_init().is_ok()
}
