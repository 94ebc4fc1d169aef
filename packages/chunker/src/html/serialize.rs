//! Serialization of node trees back to HTML markup.
//!
//! Sizes used by the chunking engine are measured on this output, so every
//! length helper here counts `char`s of the serialized form. Escaping
//! follows the HTML fragment serialization algorithm: text children of raw
//! text elements and comment bodies are written verbatim.

use super::node::{Element, HtmlNode};

/// Serialize a single node (and its subtree) to markup.
#[must_use]
pub fn serialize_node(node: &HtmlNode) -> String {
    let mut out = String::new();
    write_node(node, false, &mut out);
    out
}

/// Serialize a list of sibling nodes to markup.
#[must_use]
pub fn serialize_nodes(nodes: &[HtmlNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, false, &mut out);
    }
    out
}

/// Serialized length of a node, in characters.
#[must_use]
pub fn serialized_len(node: &HtmlNode) -> usize {
    char_len(&serialize_node(node))
}

/// Length of a string in characters.
#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Opening tag of an element, including attributes.
///
/// # Examples
/// ```
/// use html_chunker::html::{opening_tag, Element};
///
/// let el = Element::new("a").with_attribute("href", "/x?a=1&b=2");
/// assert_eq!(opening_tag(&el), r#"<a href="/x?a=1&amp;b=2">"#);
/// ```
#[must_use]
pub fn opening_tag(element: &Element) -> String {
    let mut out = String::new();
    write_opening_tag(element, &mut out);
    out
}

/// Closing tag of an element. Empty for childless void elements.
#[must_use]
pub fn closing_tag(element: &Element) -> String {
    if element.is_void() && !element.has_children() {
        String::new()
    } else {
        format!("</{}>", element.tag)
    }
}

/// Width of a text character once escaped.
#[must_use]
pub fn escaped_char_width(c: char) -> usize {
    match c {
        '&' => 5,
        '\u{a0}' => 6,
        '<' | '>' => 4,
        _ => 1,
    }
}

/// Escape text content.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped_text(text, &mut out);
    out
}

/// Escape an attribute value for use inside double quotes.
///
/// Escapes `<` and `>` as well, matching text escaping.
#[must_use]
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            _ => push_escaped_char(c, &mut out),
        }
    }
    out
}

fn push_escaped_text(text: &str, out: &mut String) {
    for c in text.chars() {
        push_escaped_char(c, out);
    }
}

fn push_escaped_char(c: char, out: &mut String) {
    match c {
        '&' => out.push_str("&amp;"),
        '\u{a0}' => out.push_str("&nbsp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        _ => out.push(c),
    }
}

fn write_opening_tag(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for attr in &element.attributes {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(&attr.value));
        out.push('"');
    }
    out.push('>');
}

/// `raw` is set for the children of a raw text element.
fn write_node(node: &HtmlNode, raw: bool, out: &mut String) {
    match node {
        HtmlNode::Text(text) if raw => out.push_str(text),
        HtmlNode::Text(text) => push_escaped_text(text, out),
        HtmlNode::Comment(body) => {
            out.push_str("<!--");
            out.push_str(body);
            out.push_str("-->");
        }
        HtmlNode::Element(element) => {
            write_opening_tag(element, out);
            let raw = element.is_raw_text();
            for child in &element.children {
                write_node(child, raw, out);
            }
            out.push_str(&closing_tag(element));
        }
    }
}
