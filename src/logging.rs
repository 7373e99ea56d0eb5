//! Diagnostic logging setup
//!
//! User-facing status lines are printed directly by the CLI. This installs the
//! `tracing` subscriber for the debug/trace events emitted by the library.

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive, e.g. `titlelab=trace`
pub const LOG_ENV: &str = "TITLELAB_LOG";

/// Default filter level: warnings only, or debug when verbose
pub fn default_level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Install a stderr fmt subscriber filtered by `TITLELAB_LOG`
pub fn init_logging(verbose: bool) {
    let level = default_level(verbose);
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();

    // Ignore error if a global subscriber is already set (e.g., when running in tests)
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_level() {
        assert_eq!(default_level(false), Level::WARN);
        assert_eq!(default_level(true), Level::DEBUG);
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logging(false);
        init_logging(true);
        tracing::debug!("still running");
    }
}
