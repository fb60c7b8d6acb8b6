//! Error types for array generation
//!
//! Library code returns [`GenError`] so the request boundary can tell argument
//! problems apart from cluster failures. The binary wraps these in `anyhow`.

use thiserror::Error;

/// Errors produced while generating distributed arrays
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenError {
    /// Request arguments are inconsistent (negative size, inverted bounds, ...)
    ///
    /// Always raised before any array is allocated.
    #[error("Incompatible arguments: {0}")]
    Argument(String),

    /// Element kind name not recognized
    #[error("unsupported dtype: {0}")]
    UnknownDtype(String),

    /// Character class name not recognized
    #[error("unknown character class: {0}")]
    UnknownCharClass(String),

    /// A bound could not be parsed as the requested element kind
    #[error("cannot parse {value:?} as {dtype}")]
    Parse { value: String, dtype: &'static str },

    /// A cluster-wide sum or offset does not fit the index type
    #[error("overflow: {0}")]
    Overflow(String),

    /// An array buffer could not be reserved
    #[error("allocation failed: {0}")]
    Allocation(String),

    /// A locale thread panicked or the collective lost a participant
    #[error("cluster failure: {0}")]
    Cluster(String),
}

/// Result type for generation routines
pub type GenResult<T> = std::result::Result<T, GenError>;
