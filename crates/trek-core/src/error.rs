//! Error types for the Trekpedia extraction engine
//!
//! Page-level failures are reported through [`TrekError`]. Row-level anomalies
//! are recovered where they happen and only logged.

use thiserror::Error;

/// Error type for Trekpedia operations
#[derive(Error, Debug)]
pub enum TrekError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to parse HTML content
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// Requested page does not exist (HTTP 404)
    #[error("Page not found: {0}")]
    NotFound(String),

    /// An expected heading, table or section is absent from the page
    #[error("Structure not found: {0}")]
    StructuralNotFound(String),

    /// No column heading matches the requested field
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    /// A short row does not fit any entry of the recovery table
    #[error("Could not reconcile row with {cells} cells against {headers} headers")]
    Unreconciled { cells: usize, headers: usize },

    /// Extractor configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for Trekpedia operations
pub type Result<T> = std::result::Result<T, TrekError>;
