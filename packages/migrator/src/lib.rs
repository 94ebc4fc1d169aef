//! Blog Migrator - Copy blog articles between stores.
//!
//! Articles are read from a source store's admin REST API and recreated on a
//! target store. Bodies larger than the configured budget are split into
//! well-formed parts with [`html_chunker`], each created as its own article.
//!
//! # Example
//!
//! ```
//! use blog_migrator::article::{matches_pattern, part_title};
//!
//! assert!(matches_pattern("2024-spring", "2024-*").unwrap());
//! assert_eq!(part_title("Guide", 2, " (Part {n})"), "Guide (Part 2)");
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants and environment configuration
//! - [`error`]: Error types and Result alias
//! - [`http`]: HTTP client with retry logic
//! - [`types`]: Store resources and request payloads
//! - [`store`]: Admin REST API client
//! - [`article`]: Title, external id and domain rewrite helpers
//! - [`migrate`]: Migration orchestration
//! - [`cli`]: Command-line interface

pub mod article;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod migrate;
pub mod store;
pub mod types;

// Re-export commonly used items
pub use config::{BehaviourConfig, MigrationConfig, StoreConfig};
pub use error::{MigratorError, Result};
pub use migrate::{MigrationOptions, MigrationReport, Migrator, PlannedPart, Progress};
pub use store::{ContentStore, StoreClient};
pub use types::{Article, ArticlePayload, Blog, Metafield, NewMetafield};
