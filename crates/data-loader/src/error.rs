//! Error types for the data-loader crate.

use thiserror::Error;

/// Errors that can occur while reading and indexing a dataset
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// A required dataset file is missing
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A rating or credit names a film that `films.dat` does not list.
    /// Only raised when loading with strict references.
    #[error("Missing reference: {entity} with id {id}")]
    MissingReference { entity: String, id: u32 },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
