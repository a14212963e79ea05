//! Logging setup.
//!
//! Two verbosity knobs: one for this crate's own targets (including the
//! `web_pad::script` target used for messages logged by the embedded
//! runtime) and one for everything else.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Target under which runtime log messages are re-emitted.
pub const SCRIPT_TARGET: &str = "web_pad::script";

/// Build the filter directive string for the given levels.
pub fn filter_directives(crate_level: Level, global_level: Level) -> String {
    format!(
        "{},{}={}",
        global_level.as_str().to_lowercase(),
        env!("CARGO_CRATE_NAME"),
        crate_level.as_str().to_lowercase()
    )
}

/// Install the global subscriber. `RUST_LOG`, when set, wins over the CLI.
pub fn init(crate_level: Level, global_level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(crate_level, global_level)));

    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();

    tracing::info!("log level set to {} (others: {})", crate_level, global_level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives() {
        let directives = filter_directives(Level::DEBUG, Level::WARN);
        assert_eq!(directives, "warn,web_pad=debug");
    }

    #[test]
    fn test_directives_parse_as_env_filter() {
        let directives = filter_directives(Level::TRACE, Level::ERROR);
        assert!(EnvFilter::try_new(directives).is_ok());
    }

    #[test]
    fn test_script_target_is_under_crate() {
        assert!(SCRIPT_TARGET.starts_with(env!("CARGO_CRATE_NAME")));
    }
}
