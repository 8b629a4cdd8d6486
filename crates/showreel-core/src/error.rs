//! Error types for Showreel Core

use thiserror::Error;

/// Result type alias for player operations
pub type Result<T> = std::result::Result<T, Error>;

/// Player error types
#[derive(Error, Debug)]
pub enum Error {
    // Catalog errors
    #[error("Unknown catalog item: {id}")]
    UnknownItem { id: String },

    #[error("Catalog index out of range: {index}")]
    IndexOutOfRange { index: usize },

    #[error("Catalog is empty")]
    EmptyCatalog,

    // Input errors
    #[error("Invalid source locator: {0}")]
    InvalidLocator(#[from] url::ParseError),

    // Session errors
    #[error("Invalid playback state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

impl Error {
    /// Returns true if this error is recoverable by selecting again
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::UnknownItem { .. } | Error::IndexOutOfRange { .. } | Error::InvalidLocator(_)
        )
    }

    /// Returns the error code for log and report output
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::UnknownItem { .. } => "UNKNOWN_ITEM",
            Error::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            Error::EmptyCatalog => "EMPTY_CATALOG",
            Error::InvalidLocator(_) => "INVALID_LOCATOR",
            Error::InvalidTransition { .. } => "INVALID_TRANSITION",
        }
    }
}
