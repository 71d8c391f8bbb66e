//! Error types for the structures crate.
//!
//! Every variant here marks a bug in the calling code rather than bad input
//! data. Lookups that miss and duplicate inserts are reported through
//! `Option` and `bool` returns instead.

use thiserror::Error;

/// Invariant violations raised by the containers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// An element's dynamic type did not match the requested output type
    #[error("Type mismatch at index {index}: expected {expected}, found {found}")]
    TypeMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StructureError>;
