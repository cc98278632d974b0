//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Library file used when neither an argument nor `BOOKSHELF_LIBRARY` is given.
pub const DEFAULT_LIBRARY_PATH: &str = "library.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable multi-line output
    Pretty,
    /// Single-line output
    #[default]
    Compact,
    /// Structured JSON, one event per line
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "bookshelf-mcp", version, about)]
pub struct Config {
    /// Path to the library JSON file
    #[arg(env = "BOOKSHELF_LIBRARY", default_value = DEFAULT_LIBRARY_PATH)]
    pub library: PathBuf,

    /// Log output format (logs are written to stderr)
    #[arg(long, env = "BOOKSHELF_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["bookshelf-mcp"]).unwrap();
        assert_eq!(config.log_format, LogFormat::Compact);
        // BOOKSHELF_LIBRARY may be set in the environment
        if std::env::var_os("BOOKSHELF_LIBRARY").is_none() {
            assert_eq!(config.library, PathBuf::from(DEFAULT_LIBRARY_PATH));
        }
    }

    #[test]
    fn positional_path_and_format() {
        let config =
            Config::try_parse_from(["bookshelf-mcp", "/tmp/books.json", "--log-format", "json"])
                .unwrap();
        assert_eq!(config.library, PathBuf::from("/tmp/books.json"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Config::try_parse_from(["bookshelf-mcp", "--log-format", "xml"]).is_err());
    }
}
