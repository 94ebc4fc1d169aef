//! Error types for the chunker.
//!
//! Most failure conditions during chunking are recovered locally and
//! reported as diagnostics instead. These errors cover invalid
//! configuration, the parser itself, and the opt-in reject policy.

use thiserror::Error;

/// Main error type for the chunker library.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// Markup ends inside a tag the tokenizer would discard.
    #[error("HTML parsing failed: unterminated tag at char {position}")]
    Parse { position: usize },

    /// Budget is not a positive integer.
    #[error("Invalid size budget: {0}. Must be a positive integer")]
    InvalidBudget(usize),

    /// An atomic element exceeds the budget and the reject policy is active.
    #[error("Element <{tag}> is {size} chars, exceeding the limit of {limit}")]
    BudgetExceeded {
        tag: String,
        size: usize,
        limit: usize,
    },

    /// Unrecognized oversize policy name.
    #[error("Unknown oversize policy: '{0}'. Expected pass-through, drop or reject")]
    UnknownPolicy(String),
}

/// Result type alias for chunker operations.
pub type Result<T> = std::result::Result<T, ChunkError>;
