//! Markup-aware splitting of HTML documents into budgeted fragments.
//!
//! This module implements recursive tree decomposition: root-level nodes
//! are packed greedily, oversized elements are split across wrapper
//! clones, and oversized text is split at word boundaries.

mod config;
mod engine;
mod text;
mod types;

pub use config::{
    ChunkerConfig, OversizePolicy, DEFAULT_BOUNDARY_RATIO, DEFAULT_IDENTIFIER_ATTRIBUTES,
};
pub use engine::{split, Chunker};
pub use text::{split_text, text_width, TextSplit};
pub use types::{ChunkOutput, Diagnostic, DiagnosticKind, Fragment};
