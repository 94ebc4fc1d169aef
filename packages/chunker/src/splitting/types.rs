//! Types for the chunking engine: fragments, diagnostics and output.

use std::fmt;

use crate::html::{char_len, serialize_nodes, HtmlNode};

/// Kind of structural event reported during chunking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Input could not be parsed; returned unsplit.
    ParseFailure,

    /// Input parsed but held no content; returned unsplit.
    EmptyDocument,

    /// An element that cannot be split further exceeds its budget.
    OversizedElement,

    /// Text was cut at the budget boundary instead of at whitespace.
    HardTextSplit,
}

impl DiagnosticKind {
    /// Stable identifier for logs and reports.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseFailure => "parse_failure",
            Self::EmptyDocument => "empty_document",
            Self::OversizedElement => "oversized_element",
            Self::HardTextSplit => "hard_text_split",
        }
    }

    /// Whether this kind means a fragment may exceed the budget or was
    /// split at a non-semantic boundary.
    #[must_use]
    pub fn is_budget_violation(&self) -> bool {
        matches!(self, Self::OversizedElement | Self::HardTextSplit)
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A warning correlated with a structural event during chunking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub detail: String,
}

impl Diagnostic {
    /// Create a new diagnostic.
    #[must_use]
    pub fn new(kind: DiagnosticKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.detail)
    }
}

/// One emitted, independently parseable unit of markup.
///
/// Immutable once built: fields are only readable through accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    nodes: Vec<HtmlNode>,
    html: String,
    len: usize,
}

impl Fragment {
    /// Build a fragment by serializing root-level nodes.
    #[must_use]
    pub fn from_nodes(nodes: Vec<HtmlNode>) -> Self {
        let html = serialize_nodes(&nodes);
        let len = char_len(&html);
        Self { nodes, html, len }
    }

    /// Wrap an unparsed input string as a fragment.
    ///
    /// Used for the fast path and for recovered failures; the node list
    /// is empty because the input was never decomposed.
    #[must_use]
    pub fn raw(html: &str) -> Self {
        Self {
            nodes: Vec::new(),
            html: html.to_string(),
            len: char_len(html),
        }
    }

    /// Root-level nodes of this fragment.
    #[must_use]
    pub fn nodes(&self) -> &[HtmlNode] {
        &self.nodes
    }

    /// Serialized markup.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Length of the serialized markup, in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the serialized markup is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether this fragment was passed through without decomposition.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Consume the fragment, returning its markup.
    #[must_use]
    pub fn into_html(self) -> String {
        self.html
    }
}

/// Result of chunking one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkOutput {
    /// Fragments in document order.
    pub fragments: Vec<Fragment>,

    /// Warnings recorded while chunking.
    pub diagnostics: Vec<Diagnostic>,
}

impl ChunkOutput {
    /// Output holding the input unchanged as its only fragment.
    #[must_use]
    pub fn unsplit(html: &str, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            fragments: vec![Fragment::raw(html)],
            diagnostics,
        }
    }

    /// Number of fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether there are no fragments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Whether any warning was recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Diagnostics of a given kind.
    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    /// Consume the output, returning the fragment markup in order.
    #[must_use]
    pub fn into_strings(self) -> Vec<String> {
        self.fragments.into_iter().map(Fragment::into_html).collect()
    }
}
