//! Store API resources and request payloads.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A blog on the store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Blog {
    pub id: u64,
    pub handle: String,
    #[serde(default)]
    pub title: String,
}

/// An article as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    /// Comma-separated tag list.
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub summary_html: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<FixedOffset>>,
}

/// A metafield attached to an article.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Metafield {
    #[serde(default)]
    pub id: Option<u64>,
    pub namespace: String,
    pub key: String,
    /// Value as stored; may be a string, number or JSON document.
    pub value: serde_json::Value,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Body of a create-article request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticlePayload {
    pub title: String,
    pub author: Option<String>,
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_html: Option<String>,
    pub body_html: String,
    pub external_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<FixedOffset>>,
}

/// Body of a create-metafield request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMetafield {
    pub namespace: String,
    pub key: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub value: serde_json::Value,
}

impl From<&Metafield> for NewMetafield {
    fn from(mf: &Metafield) -> Self {
        Self {
            namespace: mf.namespace.clone(),
            key: mf.key.clone(),
            kind: mf.kind.clone().filter(|k| !k.is_empty()),
            value: mf.value.clone(),
        }
    }
}

// Response envelopes

#[derive(Debug, Deserialize)]
pub(crate) struct BlogList {
    #[serde(default)]
    pub blogs: Vec<Blog>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArticleList {
    #[serde(default)]
    pub articles: Vec<Article>,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct ArticleEnvelope<T> {
    pub article: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetafieldList {
    #[serde(default)]
    pub metafields: Vec<Metafield>,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct MetafieldEnvelope<T> {
    pub metafield: T,
}
