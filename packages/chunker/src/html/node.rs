//! Owned document tree for HTML content.
//!
//! The parser converts the reference-counted DOM produced by `html5ever`
//! into these nodes, so every tree is an independent value. `Clone` is a full structural copy:
//! a subtree cloned into one fragment never aliases the same subtree in
//! another fragment.

/// HTML elements that never have content and are serialized without a
/// closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Check whether a tag name is an HTML void element (case-insensitive).
#[must_use]
pub fn is_void_tag(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

/// Elements whose text children are serialized verbatim, without escaping.
///
/// `noscript` is included because the parser runs with scripting enabled,
/// which makes its content raw text as well.
pub const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe", "noembed", "noframes", "noscript", "plaintext", "script", "style", "xmp",
];

/// Check whether a tag name is a raw text element (case-insensitive).
#[must_use]
pub fn is_raw_text_tag(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

/// A name/value pair on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    /// Create a new attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An element node: tag name, ordered attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name as written in the source (no namespace prefix).
    pub tag: String,

    /// Attributes in source order. Names are unique within one element.
    pub attributes: Vec<Attribute>,

    /// Child nodes in document order.
    pub children: Vec<HtmlNode>,
}

impl Element {
    /// Create an element with no attributes and no children.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing an existing attribute with the same name.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.attributes.iter_mut().find(|a| a.name == name) {
            existing.value = value;
        } else {
            self.attributes.push(Attribute { name, value });
        }
        self
    }

    /// Append children.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = HtmlNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Look up an attribute value by name (case-insensitive).
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Whether this element has at least one child node.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether this element is an HTML void element.
    #[must_use]
    pub fn is_void(&self) -> bool {
        is_void_tag(&self.tag)
    }

    /// Whether this element holds raw text (`<style>`, `<script>`, ...).
    #[must_use]
    pub fn is_raw_text(&self) -> bool {
        is_raw_text_tag(&self.tag)
    }

    /// Build a wrapper clone: same tag and attributes, holding `children`
    /// instead of the original child list.
    #[must_use]
    pub fn wrap(&self, children: Vec<HtmlNode>) -> Element {
        Element {
            tag: self.tag.clone(),
            attributes: self.attributes.clone(),
            children,
        }
    }

    /// Remove every attribute whose name is in `names` (case-insensitive).
    pub fn remove_attributes<S: AsRef<str>>(&mut self, names: &[S]) {
        self.attributes.retain(|attr| {
            !names
                .iter()
                .any(|name| name.as_ref().eq_ignore_ascii_case(&attr.name))
        });
    }
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    Element(Element),
    Text(String),
    /// Comment body, without the `<!--` and `-->` delimiters.
    Comment(String),
}

impl HtmlNode {
    /// Create a text node.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Borrow the element, if this is an element node.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) | Self::Comment(_) => None,
        }
    }

    /// Borrow the text value, if this is a text node.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Element(_) | Self::Comment(_) => None,
        }
    }

    /// Whether this node is a comment.
    #[must_use]
    pub fn is_comment(&self) -> bool {
        matches!(self, Self::Comment(_))
    }

    /// Concatenated text of this node and all its descendants. Comments
    /// contribute nothing.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

impl From<Element> for HtmlNode {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

fn collect_text(node: &HtmlNode, out: &mut String) {
    match node {
        HtmlNode::Text(text) => out.push_str(text),
        HtmlNode::Element(element) => {
            for child in &element.children {
                collect_text(child, out);
            }
        }
        HtmlNode::Comment(_) => {}
    }
}
