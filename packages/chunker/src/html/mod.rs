//! HTML document model, parsing and serialization.

mod node;
mod parse;
mod serialize;

pub use node::{
    is_raw_text_tag, is_void_tag, Attribute, Element, HtmlNode, RAW_TEXT_ELEMENTS, VOID_ELEMENTS,
};
pub use parse::parse_fragment;
pub use serialize::{
    char_len, closing_tag, escape_attribute, escape_text, escaped_char_width, opening_tag,
    serialize_node, serialize_nodes, serialized_len,
};
