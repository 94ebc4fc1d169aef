//! Chunking engine that splits an HTML document into fragments under a
//! size budget.
//!
//! Root-level nodes are packed greedily into fragments. A node too large
//! for any fragment is decomposed recursively: elements are split across
//! wrapper clones of themselves, text is split at word boundaries.

use super::config::{ChunkerConfig, OversizePolicy};
use super::text::split_text;
use super::types::{ChunkOutput, Diagnostic, DiagnosticKind, Fragment};
use crate::error::{ChunkError, Result};
use crate::html::{
    char_len, closing_tag, opening_tag, parse_fragment, serialized_len, Element, HtmlNode,
};

/// Name reported for oversized comments.
const COMMENT_LABEL: &str = "#comment";

/// Greedy accumulator for sibling nodes that share one fragment.
///
/// Scoped to a single grouping pass; never shared between recursive calls.
#[derive(Default)]
struct Group {
    nodes: Vec<HtmlNode>,
    len: usize,
}

impl Group {
    /// Whether a node of `size` can join without exceeding `budget`.
    fn fits(&self, size: usize, budget: usize) -> bool {
        self.nodes.is_empty() || self.len + size <= budget
    }

    fn push(&mut self, node: HtmlNode, size: usize) {
        self.nodes.push(node);
        self.len += size;
    }

    /// Take the accumulated nodes, leaving the group empty.
    fn take(&mut self) -> Option<Vec<HtmlNode>> {
        if self.nodes.is_empty() {
            return None;
        }
        self.len = 0;
        Some(std::mem::take(&mut self.nodes))
    }
}

/// Engine for splitting HTML into budgeted fragments.
///
/// Holds only immutable configuration, so one chunker can be shared
/// between threads and reused for any number of documents.
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    /// Create a chunker from a configuration.
    #[must_use]
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Create a chunker with default settings and the given budget.
    ///
    /// # Errors
    /// Returns `ChunkError::InvalidBudget` when `max_chars` is zero.
    pub fn with_max_chars(max_chars: usize) -> Result<Self> {
        Ok(Self::new(ChunkerConfig::new(max_chars)?))
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Split a document into fragments, collecting diagnostics.
    ///
    /// Inputs that fit the budget are returned unchanged without parsing.
    /// Unparsable or empty documents are returned unchanged with a
    /// diagnostic.
    ///
    /// # Errors
    /// Only fails under `OversizePolicy::Reject`, when an atomic element
    /// exceeds its budget.
    ///
    /// # Examples
    /// ```
    /// use html_chunker::splitting::Chunker;
    ///
    /// let chunker = Chunker::with_max_chars(20).unwrap();
    /// let output = chunker.chunk("<p>first part</p><p>second part</p>").unwrap();
    /// assert_eq!(
    ///     output.into_strings(),
    ///     vec!["<p>first part</p>", "<p>second part</p>"]
    /// );
    /// ```
    pub fn chunk(&self, html: &str) -> Result<ChunkOutput> {
        let limit = self.config.max_chars;
        let input_len = char_len(html);

        if html.is_empty() || input_len <= limit {
            return Ok(ChunkOutput::unsplit(html, Vec::new()));
        }

        let mut diagnostics = Vec::new();

        let nodes = match parse_fragment(html) {
            Ok(nodes) => nodes,
            Err(e) => {
                record(
                    &mut diagnostics,
                    DiagnosticKind::ParseFailure,
                    format!("{e}; returning input of {input_len} chars unsplit (limit {limit})"),
                );
                return Ok(ChunkOutput::unsplit(html, diagnostics));
            }
        };

        if nodes.iter().all(HtmlNode::is_comment) {
            record(
                &mut diagnostics,
                DiagnosticKind::EmptyDocument,
                format!("No content nodes in input of {input_len} chars; returning input unsplit"),
            );
            return Ok(ChunkOutput::unsplit(html, diagnostics));
        }

        let fragments = self.group_root(&nodes, &mut diagnostics)?;
        if fragments.is_empty() {
            return Ok(ChunkOutput::unsplit(html, diagnostics));
        }

        tracing::debug!(
            input_len,
            limit,
            fragments = fragments.len(),
            "Split document into fragments"
        );

        Ok(ChunkOutput {
            fragments,
            diagnostics,
        })
    }

    /// Pack root-level nodes into fragments, decomposing oversized ones.
    fn group_root(
        &self,
        nodes: &[HtmlNode],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Vec<Fragment>> {
        let limit = self.config.max_chars;
        let mut fragments = Vec::new();
        let mut group = Group::default();

        for node in nodes {
            let size = serialized_len(node);

            if size > limit {
                if let Some(grouped) = group.take() {
                    fragments.push(Fragment::from_nodes(grouped));
                }
                // Sub-fragments are already root-level
                for piece in self.decompose(node, size, limit, diagnostics)? {
                    fragments.push(Fragment::from_nodes(vec![piece]));
                }
                continue;
            }

            if !group.fits(size, limit) {
                if let Some(grouped) = group.take() {
                    fragments.push(Fragment::from_nodes(grouped));
                }
            }
            group.push(node.clone(), size);
        }

        if let Some(grouped) = group.take() {
            fragments.push(Fragment::from_nodes(grouped));
        }

        Ok(fragments)
    }

    /// Decompose a node of serialized `size` that exceeds `budget`.
    ///
    /// Each returned node is one self-contained piece.
    fn decompose(
        &self,
        node: &HtmlNode,
        size: usize,
        budget: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Vec<HtmlNode>> {
        match node {
            HtmlNode::Text(text) => {
                let split = split_text(text, budget, self.config.boundary_ratio);
                if split.hard_splits > 0 {
                    record(
                        diagnostics,
                        DiagnosticKind::HardTextSplit,
                        format!(
                            "Text of {size} chars split {} time(s) at the {budget}-char limit; no whitespace boundary found",
                            split.hard_splits
                        ),
                    );
                }
                Ok(split.pieces.into_iter().map(HtmlNode::Text).collect())
            }
            HtmlNode::Element(element) => {
                self.decompose_element(element, size, budget, diagnostics)
            }
            HtmlNode::Comment(_) => self.oversized_atomic(
                node,
                COMMENT_LABEL,
                size,
                budget,
                "cannot be split",
                diagnostics,
            ),
        }
    }

    /// Split an element's children across wrapper clones of the element.
    fn decompose_element(
        &self,
        element: &Element,
        size: usize,
        budget: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Vec<HtmlNode>> {
        let atomic = |reason: &str, diagnostics: &mut Vec<Diagnostic>| {
            let node = HtmlNode::Element(element.clone());
            self.oversized_atomic(&node, &element.tag, size, budget, reason, diagnostics)
        };

        if !element.has_children() {
            return atomic("has no children", diagnostics);
        }
        // Scripts and stylesheets stay whole
        if element.is_raw_text() {
            return atomic("holds raw text", diagnostics);
        }

        let overhead = char_len(&opening_tag(element)) + char_len(&closing_tag(element));
        if overhead >= budget {
            return atomic("has tags that leave no room for children", diagnostics);
        }
        let child_budget = budget - overhead;

        let mut wrappers: Vec<Element> = Vec::new();
        let mut group = Group::default();

        for child in &element.children {
            let child_size = serialized_len(child);

            if child_size > child_budget {
                if let Some(grouped) = group.take() {
                    wrappers.push(element.wrap(grouped));
                }
                for piece in self.decompose(child, child_size, child_budget, diagnostics)? {
                    wrappers.push(element.wrap(vec![piece]));
                }
                continue;
            }

            if !group.fits(child_size, child_budget) {
                if let Some(grouped) = group.take() {
                    wrappers.push(element.wrap(grouped));
                }
            }
            group.push(child.clone(), child_size);
        }

        if let Some(grouped) = group.take() {
            wrappers.push(element.wrap(grouped));
        }

        // Identifiers stay on the first wrapper only
        for wrapper in wrappers.iter_mut().skip(1) {
            wrapper.remove_attributes(&self.config.identifier_attributes);
        }

        Ok(wrappers.into_iter().map(HtmlNode::Element).collect())
    }

    /// Apply the oversize policy to a node that cannot be split.
    ///
    /// `name` is the tag name, or [`COMMENT_LABEL`] for comments.
    fn oversized_atomic(
        &self,
        node: &HtmlNode,
        name: &str,
        size: usize,
        budget: usize,
        reason: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Vec<HtmlNode>> {
        match self.config.policy {
            OversizePolicy::PassThrough => {
                record(
                    diagnostics,
                    DiagnosticKind::OversizedElement,
                    format!(
                        "<{name}> {reason} and is {size} chars, exceeding the limit of {budget}; emitted whole"
                    ),
                );
                Ok(vec![node.clone()])
            }
            OversizePolicy::Drop => {
                record(
                    diagnostics,
                    DiagnosticKind::OversizedElement,
                    format!(
                        "<{name}> {reason} and is {size} chars, exceeding the limit of {budget}; dropped"
                    ),
                );
                Ok(Vec::new())
            }
            OversizePolicy::Reject => Err(ChunkError::BudgetExceeded {
                tag: name.to_string(),
                size,
                limit: budget,
            }),
        }
    }
}

/// Record a diagnostic and mirror it to the log.
fn record(diagnostics: &mut Vec<Diagnostic>, kind: DiagnosticKind, detail: String) {
    tracing::warn!(kind = %kind, "{detail}");
    diagnostics.push(Diagnostic::new(kind, detail));
}

/// Split HTML into fragments of at most `max_chars` characters.
///
/// Convenience wrapper over [`Chunker`] with default settings. Never
/// fails: on any error the input is returned as the single fragment.
///
/// # Examples
/// ```
/// use html_chunker::split;
///
/// assert_eq!(split("<p>short</p>", 100), vec!["<p>short</p>"]);
///
/// let parts = split("<p>one</p><p>two</p><p>three</p>", 24);
/// assert_eq!(parts, vec!["<p>one</p><p>two</p>", "<p>three</p>"]);
/// ```
#[must_use]
pub fn split(html: &str, max_chars: usize) -> Vec<String> {
    match Chunker::with_max_chars(max_chars).and_then(|chunker| chunker.chunk(html)) {
        Ok(output) => output.into_strings(),
        Err(e) => {
            tracing::warn!(error = %e, "Chunking failed, returning input unsplit");
            vec![html.to_string()]
        }
    }
}
