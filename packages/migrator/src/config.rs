//! Configuration constants and environment loading for the migrator.

use std::fmt;

use html_chunker::OversizePolicy;

use crate::error::{MigratorError, Result};

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Page size used for every list request (the store API maximum).
pub const PAGE_LIMIT: u32 = 250;

/// REST API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "2025-01";

/// Blog handle used when none is configured.
pub const DEFAULT_BLOG_HANDLE: &str = "blog";

/// Default body budget per created article, in characters.
pub const DEFAULT_MAX_BODY_CHARS: usize = 240_000;

/// Default part title suffix; `{n}` is replaced by the part number.
pub const DEFAULT_TITLE_PART_SUFFIX: &str = " (Part {n})";

/// Prefix of the external id stamped on migrated articles.
pub const EXTERNAL_ID_PREFIX: &str = "migrated:article:";

/// Connection settings for one store.
///
/// `Debug` is implemented by hand so the access token never ends up in logs.
#[derive(Clone)]
pub struct StoreConfig {
    /// Store host, e.g. `example.myshopify.com`.
    pub shop: String,
    pub token: String,
    pub api_version: String,
    pub blog_handle: String,
}

impl StoreConfig {
    pub fn new(shop: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            shop: shop.into(),
            token: token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            blog_handle: DEFAULT_BLOG_HANDLE.to_string(),
        }
    }

    #[must_use]
    pub fn with_blog_handle(mut self, handle: impl Into<String>) -> Self {
        self.blog_handle = handle.into();
        self
    }

    /// Base URL of the admin REST API for this store.
    pub fn api_base_url(&self) -> String {
        format!("https://{}/admin/api/{}", self.shop, self.api_version)
    }

    fn from_lookup(prefix: &str, lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| {
            lookup(&format!("{prefix}_{name}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let (Some(shop), Some(token)) = (get("SHOP"), get("TOKEN")) else {
            return Err(MigratorError::Config(format!(
                "Missing config for {prefix} store"
            )));
        };

        Ok(Self {
            shop,
            token,
            api_version: get("API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.into()),
            blog_handle: get("BLOG_HANDLE").unwrap_or_else(|| DEFAULT_BLOG_HANDLE.into()),
        })
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("shop", &self.shop)
            .field("token", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("blog_handle", &self.blog_handle)
            .finish()
    }
}

/// Settings that shape how articles are copied.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviourConfig {
    pub preserve_published_at: bool,
    pub max_body_chars: usize,
    pub title_part_suffix: String,
    /// Domain rewrite pair; rewriting is off unless both are non-empty.
    pub rewrite_from: String,
    pub rewrite_to: String,
    pub dry_run: bool,
    pub oversize_policy: OversizePolicy,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            preserve_published_at: true,
            max_body_chars: DEFAULT_MAX_BODY_CHARS,
            title_part_suffix: DEFAULT_TITLE_PART_SUFFIX.to_string(),
            rewrite_from: String::new(),
            rewrite_to: String::new(),
            dry_run: false,
            oversize_policy: OversizePolicy::default(),
        }
    }
}

impl BehaviourConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let max_body_chars = match lookup("MAX_BODY_CHARS") {
            Some(value) => parse_max_body_chars(&value)?,
            None => defaults.max_body_chars,
        };

        let oversize_policy = match lookup("OVERSIZE_POLICY") {
            Some(value) => value
                .parse::<OversizePolicy>()
                .map_err(|e| MigratorError::Config(e.to_string()))?,
            None => defaults.oversize_policy,
        };

        Ok(Self {
            preserve_published_at: parse_bool(
                lookup("PRESERVE_PUBLISHED_AT"),
                defaults.preserve_published_at,
            ),
            max_body_chars,
            title_part_suffix: lookup("TITLE_PART_SUFFIX").unwrap_or(defaults.title_part_suffix),
            rewrite_from: lookup("REWRITE_DOMAIN_FROM")
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            rewrite_to: lookup("REWRITE_DOMAIN_TO")
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            dry_run: parse_bool(lookup("DRY_RUN"), defaults.dry_run),
            oversize_policy,
        })
    }
}

/// Full migrator configuration.
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    pub source: StoreConfig,
    pub target: StoreConfig,
    pub behaviour: BehaviourConfig,
}

impl MigrationConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            source: StoreConfig::from_lookup("SOURCE", &lookup)?,
            target: StoreConfig::from_lookup("TARGET", &lookup)?,
            behaviour: BehaviourConfig::from_lookup(&lookup)?,
        })
    }
}

/// Parse a body budget; it must be a positive integer.
///
/// # Examples
/// ```
/// use blog_migrator::config::parse_max_body_chars;
///
/// assert_eq!(parse_max_body_chars("240000").unwrap(), 240_000);
/// assert!(parse_max_body_chars("0").is_err());
/// assert!(parse_max_body_chars("lots").is_err());
/// ```
pub fn parse_max_body_chars(value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(MigratorError::Config(format!(
            "MAX_BODY_CHARS must be a positive integer, got {value:?}"
        ))),
    }
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    value.map_or(default, |v| v.trim().eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    const STORES: &[(&str, &str)] = &[
        ("SOURCE_SHOP", "old.myshopify.com"),
        ("SOURCE_TOKEN", "shpat_source"),
        ("TARGET_SHOP", "new.myshopify.com"),
        ("TARGET_TOKEN", "shpat_target"),
    ];

    #[test]
    fn test_defaults() {
        let config = MigrationConfig::from_lookup(lookup_from(STORES)).unwrap();

        assert_eq!(config.source.shop, "old.myshopify.com");
        assert_eq!(config.source.api_version, "2025-01");
        assert_eq!(config.target.blog_handle, "blog");
        assert_eq!(config.behaviour, BehaviourConfig::default());
    }

    #[test]
    fn test_overrides() {
        let mut pairs = STORES.to_vec();
        pairs.extend([
            ("TARGET_BLOG_HANDLE", "news"),
            ("SOURCE_API_VERSION", "2024-10"),
            ("PRESERVE_PUBLISHED_AT", "FALSE"),
            ("MAX_BODY_CHARS", "5000"),
            ("TITLE_PART_SUFFIX", " - {n}"),
            ("REWRITE_DOMAIN_FROM", "  old.example.com "),
            ("REWRITE_DOMAIN_TO", "new.example.com"),
            ("DRY_RUN", "True"),
            ("OVERSIZE_POLICY", "drop"),
        ]);
        let config = MigrationConfig::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.target.blog_handle, "news");
        assert_eq!(config.source.api_version, "2024-10");
        let b = config.behaviour;
        assert!(!b.preserve_published_at);
        assert_eq!(b.max_body_chars, 5000);
        assert_eq!(b.title_part_suffix, " - {n}");
        assert_eq!(b.rewrite_from, "old.example.com");
        assert_eq!(b.rewrite_to, "new.example.com");
        assert!(b.dry_run);
        assert_eq!(b.oversize_policy, OversizePolicy::Drop);
    }

    #[test]
    fn test_missing_store_config() {
        let err = MigrationConfig::from_lookup(lookup_from(&STORES[..3])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing config for TARGET store"
        );
    }

    #[test]
    fn test_invalid_max_body_chars() {
        let mut pairs = STORES.to_vec();
        pairs.push(("MAX_BODY_CHARS", "-5"));
        let err = MigrationConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(err.to_string().contains("\"-5\""));
    }

    #[test]
    fn test_invalid_policy() {
        let mut pairs = STORES.to_vec();
        pairs.push(("OVERSIZE_POLICY", "truncate"));
        assert!(matches!(
            MigrationConfig::from_lookup(lookup_from(&pairs)),
            Err(MigratorError::Config(_))
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let store = StoreConfig::new("shop.example", "shpat_secret");
        let debug = format!("{store:?}");
        assert!(!debug.contains("shpat_secret"));
        assert!(debug.contains("shop.example"));
    }

    #[test]
    fn test_api_base_url() {
        let store = StoreConfig::new("shop.example", "t");
        assert_eq!(store.api_base_url(), "https://shop.example/admin/api/2025-01");
    }
}
