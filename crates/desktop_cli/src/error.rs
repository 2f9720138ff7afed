//! Error type for the session replay binary.

use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced to the user as a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    /// The session file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ReadConfig {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The session file is not valid TOML for the expected shape.
    #[error("failed to parse {}: {source}", path.display())]
    ParseConfig {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying parse failure.
        source: toml::de::Error,
    },
    /// A script step names an app that is not registered.
    #[error("step {step}: unknown app id `{app_id}`")]
    UnknownApp {
        /// One-based step number.
        step: usize,
        /// Offending id.
        app_id: String,
    },
    /// Invalid command-line arguments.
    #[error("{0}")]
    Usage(String),
}

/// Convenience result type for the CLI.
pub type CliResult<T> = Result<T, CliError>;
