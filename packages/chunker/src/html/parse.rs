//! HTML parsing on top of `html5ever`.
//!
//! Input is parsed as an HTML5 fragment in `<body>` context, the way a
//! browser parses `innerHTML`: entities, unquoted and boolean attributes,
//! implied end tags and stray end tags are all recovered. The resulting
//! `markup5ever_rcdom` tree is converted into owned [`HtmlNode`]s.
//!
//! The one input this module refuses is markup that ends inside an
//! unterminated tag. The tokenizer would silently drop that tail, so it is
//! reported as an error and the caller keeps the input unchanged.

use html5ever::tendril::TendrilSink;
use html5ever::{local_name, namespace_url, ns, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::node::{Attribute, Element, HtmlNode};
use crate::error::{ChunkError, Result};

/// Parse an HTML fragment into its root-level nodes.
///
/// Comments are kept as [`HtmlNode::Comment`]; doctypes and processing
/// instructions are dropped.
///
/// # Errors
/// Returns `ChunkError::Parse` when the markup ends inside an unterminated
/// tag such as a trailing `<` or `<img src="x`.
///
/// # Examples
/// ```
/// use html_chunker::html::{parse_fragment, HtmlNode};
///
/// let nodes = parse_fragment("<p>Caf&eacute; &amp; more<p>tail").unwrap();
/// assert_eq!(nodes.len(), 2);
/// assert_eq!(nodes[0].text_content(), "Café & more");
/// assert_eq!(nodes[1].text_content(), "tail");
///
/// assert!(parse_fragment("<p>text</p><").is_err());
/// ```
pub fn parse_fragment(html: &str) -> Result<Vec<HtmlNode>> {
    if let Some(position) = unterminated_tag_position(html) {
        return Err(ChunkError::Parse { position });
    }

    let context = QualName::new(None, ns!(html), local_name!("body"));
    let dom = html5ever::parse_fragment(RcDom::default(), ParseOpts::default(), context, vec![])
        .one(html);

    if !dom.errors.is_empty() {
        tracing::debug!(
            errors = dom.errors.len(),
            first = %dom.errors[0],
            "Recovered from malformed markup"
        );
    }

    // The fragment parser puts everything under a synthetic <html> element
    let document_children = dom.document.children.borrow();
    let Some(root) = document_children.first() else {
        return Ok(Vec::new());
    };

    Ok(convert_children(root))
}

/// Get the tag name of an element without namespace prefix.
fn get_tag_name(name: &QualName) -> &str {
    &name.local
}

/// Char offset of a `<` that opens a tag never closed before end of input.
///
/// A `<` not followed by a letter, `/`, `!` or `?` is plain text to the
/// tokenizer and does not count, except at the very end of the input.
fn unterminated_tag_position(html: &str) -> Option<usize> {
    let start = html.rfind('<')?;
    let tail = &html[start + 1..];
    if tail.contains('>') {
        return None;
    }

    let opens_markup = match tail.chars().next() {
        None => true,
        Some(c) => c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'),
    };
    opens_markup.then(|| html[..start].chars().count())
}

/// Convert the children of a DOM node into owned nodes.
///
/// Adjacent text runs are merged.
fn convert_children(handle: &Handle) -> Vec<HtmlNode> {
    let mut children: Vec<HtmlNode> = Vec::new();

    for child in handle.children.borrow().iter() {
        let Some(converted) = convert_node(child) else {
            continue;
        };

        match (children.last_mut(), converted) {
            (Some(HtmlNode::Text(previous)), HtmlNode::Text(text)) => previous.push_str(&text),
            (_, converted) => children.push(converted),
        }
    }

    children
}

fn convert_node(handle: &Handle) -> Option<HtmlNode> {
    match &handle.data {
        NodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            let attributes = attrs
                .borrow()
                .iter()
                .map(|attr| {
                    let local = get_tag_name(&attr.name);
                    match &attr.name.prefix {
                        Some(prefix) => Attribute::new(format!("{prefix}:{local}"), &*attr.value),
                        None => Attribute::new(local, &*attr.value),
                    }
                })
                .collect();

            // <template> keeps its content in a separate document fragment
            let children = match template_contents.borrow().as_ref() {
                Some(contents) => convert_children(contents),
                None => convert_children(handle),
            };

            Some(HtmlNode::Element(Element {
                tag: get_tag_name(name).to_string(),
                attributes,
                children,
            }))
        }
        NodeData::Text { contents } => Some(HtmlNode::text(contents.borrow().to_string())),
        NodeData::Comment { contents } => Some(HtmlNode::Comment(contents.to_string())),
        NodeData::Document
        | NodeData::Doctype { .. }
        | NodeData::ProcessingInstruction { .. } => None,
    }
}
