//! HTML Chunker - Split rich-text HTML into well-formed fragments.
//!
//! Given an HTML document and a maximum character budget, this crate
//! produces an ordered sequence of fragments such that each fragment is
//! independently well-formed, stays within the budget unless a single
//! atomic element makes that impossible, keeps the original nesting and
//! attributes, and carries identifier attributes only once.
//!
//! # Example
//!
//! ```
//! use html_chunker::split;
//!
//! let html = format!(r#"<div id="x"><p>{}</p></div>"#, "A".repeat(120));
//! let parts = split(&html, 100);
//!
//! assert_eq!(parts.len(), 2);
//! assert!(parts[0].starts_with(r#"<div id="x">"#));
//! assert!(parts[1].starts_with("<div>"));
//! ```
//!
//! # Architecture
//!
//! - [`html`]: Owned node tree, parser adapter and serializer
//! - [`splitting`]: Chunking engine, text splitting and configuration
//! - [`error`]: Error types and Result alias

pub mod error;
pub mod html;
pub mod splitting;

// Re-export commonly used items
pub use error::{ChunkError, Result};
pub use splitting::{
    split, ChunkOutput, Chunker, ChunkerConfig, Diagnostic, DiagnosticKind, Fragment,
    OversizePolicy,
};
