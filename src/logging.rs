//! Structured logging setup.
//!
//! The host talks to the provider over stdout, so every subscriber installed
//! here writes to **stderr**. Filtering follows `RUST_LOG`; without it the
//! default directive applies.
//!
//! ```bash
//! # Request-level logging from the dashboard client
//! RUST_LOG=meraki_provider::client=debug ./terraform-provider-meraki
//! ```
//!
//! Request and response bodies are only logged when the provider is
//! configured with `meraki_debug`, and even then at `debug` level.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default directive when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Directive used by [`init_debug_logging`].
pub const DEBUG_DIRECTIVE: &str = "info,meraki_provider=debug";

/// Install the stderr subscriber, defaulting to `info`.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    init_logging_with_default(DEFAULT_DIRECTIVE);
}

/// Like [`init_logging`] with a custom default directive.
pub fn init_logging_with_default(default_directive: &str) {
    tracing_subscriber::registry()
        .with(env_filter(default_directive))
        .with(stderr_layer())
        .init();
}

/// Install the subscriber with this crate at `debug` unless `RUST_LOG` says
/// otherwise. Returns `false` if a subscriber was already set.
pub fn init_debug_logging() -> bool {
    try_init_logging_with_default(DEBUG_DIRECTIVE)
}

/// Install the subscriber unless one is already set.
///
/// Returns `true` if this call installed it. Safe to call from tests.
pub fn try_init_logging() -> bool {
    try_init_logging_with_default(DEFAULT_DIRECTIVE)
}

fn try_init_logging_with_default(default_directive: &str) -> bool {
    tracing_subscriber::registry()
        .with(env_filter(default_directive))
        .with(stderr_layer())
        .try_init()
        .is_ok()
}

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

#[cfg(test)]
mod tests {
    // The global subscriber can only be set once per process, so only the
    // filter directives are checked here.

    use super::*;

    #[test]
    fn test_directives_parse() {
        assert!(EnvFilter::try_new(DEFAULT_DIRECTIVE).is_ok());
        assert!(EnvFilter::try_new(DEBUG_DIRECTIVE).is_ok());
        assert!(EnvFilter::try_new("warn,meraki_provider::client=debug").is_ok());
    }

    #[test]
    fn test_try_init_is_idempotent() {
        let _ = try_init_logging();
        assert!(!try_init_logging());
    }
}
