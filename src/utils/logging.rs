//! Structured logging setup using tracing-subscriber
//!
//! Diagnostics go to stderr so they never mix with the metrics table on
//! stdout. `RUST_LOG` takes precedence over the verbosity flag.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Map the number of `-v` flags to a log level
pub fn level_from_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Filter directive used when `RUST_LOG` is not set
pub fn default_filter(level: Level) -> String {
    format!("warn,fairlens={}", level.as_str().to_lowercase())
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init_logging(verbose: u8) {
    let level = level_from_verbosity(verbose);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_from_verbosity(0), Level::WARN);
        assert_eq!(level_from_verbosity(1), Level::INFO);
        assert_eq!(level_from_verbosity(2), Level::DEBUG);
        assert_eq!(level_from_verbosity(9), Level::TRACE);
    }

    #[test]
    fn test_default_filter_targets_crate() {
        assert_eq!(default_filter(Level::DEBUG), "warn,fairlens=debug");
    }
}
