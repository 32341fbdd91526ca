//! Error types for the keyword grouping library

use thiserror::Error;

/// Result type alias for this library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, grouping or writing keywords
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reading or writing delimited files
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error serializing the JSON report
    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required column is absent from an input file
    #[error("Missing column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    /// A pattern table row does not compile to a regular expression
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The search endpoint used for SERP links is not a valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
