//! Store admin REST API client.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::LINK;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::{StoreConfig, PAGE_LIMIT};
use crate::error::{MigratorError, Result};
use crate::http::{create_client, send_with_retry};
use crate::types::{
    Article, ArticleEnvelope, ArticleList, ArticlePayload, BlogList, Metafield, MetafieldEnvelope,
    MetafieldList, NewMetafield,
};

/// `<url>; rel="next"` entry of a `Link` header.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NEXT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<([^>]+)>;\s*rel="next""#).expect("valid regex"));

/// Operations the migrator needs from a store.
pub trait ContentStore: Send + Sync {
    /// Id of the first blog whose handle equals `handle`.
    fn find_blog_id_by_handle(&self, handle: &str) -> Result<u64>;

    /// Every article of a blog, across all pages.
    fn list_articles(&self, blog_id: u64) -> Result<Vec<Article>>;

    fn get_article(&self, blog_id: u64, article_id: u64) -> Result<Article>;

    fn get_article_metafields(&self, article_id: u64) -> Result<Vec<Metafield>>;

    fn create_article(&self, blog_id: u64, payload: &ArticlePayload) -> Result<Article>;

    fn create_metafield(&self, article_id: u64, metafield: &NewMetafield) -> Result<Metafield>;
}

/// Blocking client for one store's admin REST API.
///
/// NOTE: Do NOT derive `Debug` on this struct; the client holds the access token.
pub struct StoreClient {
    http: Client,
    base_url: String,
}

impl StoreClient {
    /// Create a client for the store described by `config`.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        Self::with_base_url(&config.api_base_url(), &config.token)
    }

    /// Create a client against an explicit API base URL.
    pub fn with_base_url(base_url: &str, token: &str) -> Result<Self> {
        // Validate once so endpoint construction only fails on bad paths
        Url::parse(base_url)?;
        Ok(Self {
            http: create_client(token)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{path}", self.base_url))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    /// GET a JSON resource; also returns the `Link` header when present.
    fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<(T, Option<String>)> {
        let response = send_with_retry(url.as_str(), || self.http.get(url.clone()))?;
        let link = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text()?;
        Ok((serde_json::from_str(&body)?, link))
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(&self, url: &Url, body: &B) -> Result<T> {
        let payload = serde_json::to_vec(body)?;
        let response = send_with_retry(url.as_str(), || {
            self.http
                .post(url.clone())
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(payload.clone())
        })?;
        let text = response.text()?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl ContentStore for StoreClient {
    fn find_blog_id_by_handle(&self, handle: &str) -> Result<u64> {
        let url = self.endpoint("/blogs.json", &[("limit", PAGE_LIMIT.to_string())])?;
        let (list, _): (BlogList, _) = self.get_json(&url)?;

        list.blogs
            .into_iter()
            .find(|blog| blog.handle == handle)
            .map(|blog| blog.id)
            .ok_or_else(|| MigratorError::BlogNotFound {
                handle: handle.to_string(),
            })
    }

    fn list_articles(&self, blog_id: u64) -> Result<Vec<Article>> {
        let path = format!("/blogs/{blog_id}/articles.json");
        let mut articles = Vec::new();
        let mut page_info: Option<String> = None;

        loop {
            let mut params = vec![("limit", PAGE_LIMIT.to_string())];
            if let Some(info) = page_info.take() {
                params.push(("page_info", info));
            }
            let url = self.endpoint(&path, &params)?;
            let (page, link): (ArticleList, _) = self.get_json(&url)?;

            tracing::debug!(blog_id, count = page.articles.len(), "Fetched article page");
            articles.extend(page.articles);

            page_info = link.as_deref().and_then(next_page_info);
            if page_info.is_none() {
                break;
            }
        }

        Ok(articles)
    }

    fn get_article(&self, blog_id: u64, article_id: u64) -> Result<Article> {
        let url = self.endpoint(&format!("/blogs/{blog_id}/articles/{article_id}.json"), &[])?;
        let (envelope, _): (ArticleEnvelope<Article>, _) = self.get_json(&url)?;
        Ok(envelope.article)
    }

    fn get_article_metafields(&self, article_id: u64) -> Result<Vec<Metafield>> {
        let url = self.endpoint(
            &format!("/articles/{article_id}/metafields.json"),
            &[("limit", PAGE_LIMIT.to_string())],
        )?;
        let (list, _): (MetafieldList, _) = self.get_json(&url)?;
        Ok(list.metafields)
    }

    fn create_article(&self, blog_id: u64, payload: &ArticlePayload) -> Result<Article> {
        let url = self.endpoint(&format!("/blogs/{blog_id}/articles.json"), &[])?;
        let envelope: ArticleEnvelope<Article> =
            self.post_json(&url, &ArticleEnvelope { article: payload })?;
        Ok(envelope.article)
    }

    fn create_metafield(&self, article_id: u64, metafield: &NewMetafield) -> Result<Metafield> {
        let url = self.endpoint(&format!("/articles/{article_id}/metafields.json"), &[])?;
        let envelope: MetafieldEnvelope<Metafield> =
            self.post_json(&url, &MetafieldEnvelope { metafield })?;
        Ok(envelope.metafield)
    }
}

/// Extract the `page_info` cursor of the `rel="next"` entry in a `Link` header.
///
/// # Examples
/// ```
/// use blog_migrator::store::next_page_info;
///
/// let link = r#"<https://s.example/admin/api/2025-01/blogs/1/articles.json?limit=250&page_info=abc>; rel="next""#;
/// assert_eq!(next_page_info(link), Some("abc".to_string()));
/// assert_eq!(next_page_info(""), None);
/// ```
pub fn next_page_info(link: &str) -> Option<String> {
    let captures = NEXT_LINK.captures(link)?;
    let url = Url::parse(captures.get(1)?.as_str()).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "page_info")
        .map(|(_, value)| value.into_owned())
}
