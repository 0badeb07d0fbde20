//! Error types for the docwalk library.
//!
//! Only configuration and I/O problems are reported through [`DocwalkError`].
//! Running out of documents or positions is not an error: query nodes and
//! location cursors report it with the sentinel values in [`crate::types`].
//!
//! # Examples
//!
//! ```
//! use docwalk::error::{DocwalkError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(DocwalkError::configuration("unknown calculator"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for docwalk operations.
#[derive(Error, Debug)]
pub enum DocwalkError {
    /// I/O errors (reading configuration or corpus files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unsupported or malformed configuration (scoring parameters, config files)
    #[error("Unsupported configuration: {0}")]
    Configuration(String),

    /// Query-related errors (invalid node construction arguments)
    #[error("Query error: {0}")]
    Query(String),

    /// Index-related errors (missing corpus statistics, bad corpus input)
    #[error("Index error: {0}")]
    Index(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors carrying file context (corpus loading)
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with DocwalkError.
pub type Result<T> = std::result::Result<T, DocwalkError>;

impl DocwalkError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        DocwalkError::Configuration(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        DocwalkError::Query(msg.into())
    }

    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        DocwalkError::Index(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        DocwalkError::InvalidArgument(msg.into())
    }

    /// Returns true if this error was caused by an unsupported configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, DocwalkError::Configuration(_))
    }
}
