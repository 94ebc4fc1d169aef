//! Error types for the migrator.
//!
//! Uses the dual-error pattern: `MigratorError` for library consumers with
//! detailed error context, wrapping `ChunkError` from the chunker crate.

use html_chunker::ChunkError;
use thiserror::Error;

/// Main error type for the migrator library.
#[derive(Debug, Error)]
pub enum MigratorError {
    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Store API answered with a non-retryable error status.
    #[error("Store API error (status {status}) for {url}: {body}")]
    Api {
        status: u16,
        url: String,
        body: String,
    },

    /// All retry attempts failed.
    #[error("Request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// No blog with the requested handle exists on the store.
    #[error("Blog handle not found: {handle}")]
    BlogNotFound { handle: String },

    /// Response body could not be decoded.
    #[error("Invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Title pattern could not be compiled.
    #[error("Invalid title pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Chunking failed (only under the reject oversize policy).
    #[error("Chunking failed: {0}")]
    Chunk(#[from] ChunkError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for migrator operations.
pub type Result<T> = std::result::Result<T, MigratorError>;
