use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the post-trends crates.
///
/// The parsing and aggregation core never returns these; they come from the
/// collaborators around it (line sources, configuration, rendering).
#[derive(Error, Debug)]
pub enum TrendsError {
    /// A source file exists but could not be opened or read.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No line source is available for a configured country.
    #[error("No source for {country} at {path}")]
    SourceNotFound { country: String, path: PathBuf },

    /// The expected data directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No CSV exports were found under the given directory.
    #[error("No CSV files found in {0}")]
    NoDataFiles(PathBuf),

    /// A country set was built from an empty list.
    #[error("No countries configured")]
    NoCountries,

    /// A timezone name is not a recognised IANA identifier.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A report could not be serialised.
    #[error("Failed to serialise JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the post-trends crates.
pub type Result<T> = std::result::Result<T, TrendsError>;
