use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

/// Command-line arguments shared by every editor variant.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity for this application's own log messages
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", default_value = "info", value_parser = parse_level)]
    pub log_level: Level,

    /// Verbosity for everything else (toolkit, webview, libraries)
    #[arg(long = "log-level-global", value_name = "LEVEL", default_value = "warn", value_parser = parse_level)]
    pub log_level_global: Level,

    /// The file to open
    pub file: Option<PathBuf>,
}

/// Accept the usual level names plus the older SEVERE/WARNING/FINE style.
pub fn parse_level(s: &str) -> Result<Level, String> {
    match s.to_ascii_lowercase().as_str() {
        "error" | "severe" => Ok(Level::ERROR),
        "warn" | "warning" => Ok(Level::WARN),
        "info" | "config" => Ok(Level::INFO),
        "debug" | "fine" => Ok(Level::DEBUG),
        "trace" | "finer" | "finest" | "all" => Ok(Level::TRACE),
        _ => Err(format!(
            "invalid log level '{}' (expected error, warn, info, debug or trace)",
            s
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["webpad"]).unwrap();
        assert_eq!(cli.log_level, Level::INFO);
        assert_eq!(cli.log_level_global, Level::WARN);
        assert!(cli.file.is_none());
    }

    #[test]
    fn test_levels_and_file() {
        let cli = Cli::try_parse_from([
            "webpad",
            "--log-level",
            "debug",
            "--log-level-global",
            "ERROR",
            "notes.md",
        ])
        .unwrap();
        assert_eq!(cli.log_level, Level::DEBUG);
        assert_eq!(cli.log_level_global, Level::ERROR);
        assert_eq!(cli.file, Some(PathBuf::from("notes.md")));
    }

    #[test]
    fn test_legacy_level_names() {
        assert_eq!(parse_level("WARNING").unwrap(), Level::WARN);
        assert_eq!(parse_level("fine").unwrap(), Level::DEBUG);
        assert_eq!(parse_level("SEVERE").unwrap(), Level::ERROR);
    }

    #[test]
    fn test_invalid_level_is_usage_error() {
        let err = Cli::try_parse_from(["webpad", "--log-level", "loud"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
