//! Article migration between two stores.

use html_chunker::{Chunker, ChunkerConfig};

use crate::article::{
    external_id_for, part_external_id, part_title, rewrite_domains, TitlePattern,
};
use crate::config::BehaviourConfig;
use crate::error::Result;
use crate::store::ContentStore;
use crate::types::{Article, ArticlePayload, NewMetafield};

/// Which source articles to migrate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationOptions {
    /// Article ids to migrate; empty means all.
    pub only_ids: Vec<String>,

    /// `*` wildcard matched against article titles.
    pub pattern: Option<String>,
}

/// Progress notifications emitted while migrating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress<'a> {
    /// Source articles were listed and filtered.
    Listed { found: usize, selected: usize },

    /// Work on one article started (`index` is 1-based).
    Article {
        index: usize,
        total: usize,
        id: u64,
        title: &'a str,
    },
}

/// A part that would have been created in dry-run mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPart {
    pub title: String,
    pub external_id: String,
    pub chars: usize,
}

/// Summary of a migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub articles_found: usize,
    pub articles_processed: usize,
    pub parts_created: usize,
    /// Parts logged instead of created (dry run).
    pub planned: Vec<PlannedPart>,
    /// Chunking diagnostics, prefixed with the article id.
    pub chunk_warnings: Vec<String>,
    pub metafield_failures: usize,
}

/// Copies articles from a source store to a target store.
pub struct Migrator<S> {
    source: S,
    target: S,
    source_handle: String,
    target_handle: String,
    behaviour: BehaviourConfig,
    chunker: Chunker,
}

impl<S: ContentStore> Migrator<S> {
    /// Create a migrator.
    ///
    /// # Errors
    /// Returns an error when the body budget is zero.
    pub fn new(
        source: S,
        source_handle: impl Into<String>,
        target: S,
        target_handle: impl Into<String>,
        behaviour: BehaviourConfig,
    ) -> Result<Self> {
        let chunker = Chunker::new(
            ChunkerConfig::new(behaviour.max_body_chars)?.with_policy(behaviour.oversize_policy),
        );
        Ok(Self {
            source,
            target,
            source_handle: source_handle.into(),
            target_handle: target_handle.into(),
            behaviour,
            chunker,
        })
    }

    /// Migrate the selected articles.
    pub fn run(&self, options: &MigrationOptions) -> Result<MigrationReport> {
        self.run_with_progress(options, |_| {})
    }

    /// Migrate the selected articles, reporting progress to `on_progress`.
    pub fn run_with_progress(
        &self,
        options: &MigrationOptions,
        mut on_progress: impl FnMut(Progress<'_>),
    ) -> Result<MigrationReport> {
        let pattern = TitlePattern::new(options.pattern.as_deref().unwrap_or_default())?;

        let source_blog = self.source.find_blog_id_by_handle(&self.source_handle)?;
        let target_blog = self.target.find_blog_id_by_handle(&self.target_handle)?;

        let articles = self.source.list_articles(source_blog)?;
        let selected: Vec<&Article> = articles
            .iter()
            .filter(|a| options.only_ids.is_empty() || options.only_ids.contains(&a.id.to_string()))
            .filter(|a| pattern.matches(&a.title))
            .collect();

        tracing::info!(
            found = articles.len(),
            selected = selected.len(),
            "Listed source articles"
        );
        on_progress(Progress::Listed {
            found: articles.len(),
            selected: selected.len(),
        });

        let mut report = MigrationReport {
            articles_found: articles.len(),
            ..MigrationReport::default()
        };

        for (i, summary) in selected.iter().enumerate() {
            on_progress(Progress::Article {
                index: i + 1,
                total: selected.len(),
                id: summary.id,
                title: &summary.title,
            });
            self.migrate_article(source_blog, target_blog, summary.id, &mut report)?;
            report.articles_processed += 1;
        }

        Ok(report)
    }

    fn migrate_article(
        &self,
        source_blog: u64,
        target_blog: u64,
        article_id: u64,
        report: &mut MigrationReport,
    ) -> Result<()> {
        let article = self.source.get_article(source_blog, article_id)?;
        tracing::info!(id = article.id, title = %article.title, "Migrating article");

        let payloads = self.plan_parts(&article, report)?;
        let metafields = self.source.get_article_metafields(article.id)?;

        for payload in payloads {
            if self.behaviour.dry_run {
                let chars = payload.body_html.chars().count();
                tracing::info!(title = %payload.title, chars, "Dry run, would create article");
                report.planned.push(PlannedPart {
                    title: payload.title,
                    external_id: payload.external_id,
                    chars,
                });
                continue;
            }

            let created = self.target.create_article(target_blog, &payload)?;
            tracing::info!(id = created.id, title = %created.title, "Created article");
            report.parts_created += 1;

            for mf in &metafields {
                if let Err(e) = self.target.create_metafield(created.id, &NewMetafield::from(mf)) {
                    tracing::warn!(
                        namespace = %mf.namespace,
                        key = %mf.key,
                        error = %e,
                        "Metafield copy failed"
                    );
                    report.metafield_failures += 1;
                }
            }
        }

        Ok(())
    }

    /// Build the create payloads for one source article.
    ///
    /// The body is domain-rewritten and chunked; chunking diagnostics are
    /// added to `report`.
    pub fn plan_parts(
        &self,
        article: &Article,
        report: &mut MigrationReport,
    ) -> Result<Vec<ArticlePayload>> {
        let body = rewrite_domains(
            article.body_html.as_deref().unwrap_or_default(),
            &self.behaviour.rewrite_from,
            &self.behaviour.rewrite_to,
        );

        let output = self.chunker.chunk(&body)?;
        report.chunk_warnings.extend(
            output
                .diagnostics
                .iter()
                .map(|d| format!("article {}: {d}", article.id)),
        );

        let parts = output.into_strings();
        let multi = parts.len() > 1;

        let payloads = parts
            .into_iter()
            .enumerate()
            .map(|(i, body_html)| {
                let part = i + 1;
                ArticlePayload {
                    title: if multi {
                        part_title(&article.title, part, &self.behaviour.title_part_suffix)
                    } else {
                        article.title.clone()
                    },
                    author: article.author.clone(),
                    tags: article.tags.clone(),
                    summary_html: article.summary_html.clone().filter(|s| !s.is_empty()),
                    body_html,
                    external_id: if multi {
                        part_external_id(article.id, part)
                    } else {
                        external_id_for(article.id)
                    },
                    published_at: if self.behaviour.preserve_published_at {
                        article.published_at
                    } else {
                        None
                    },
                }
            })
            .collect();

        Ok(payloads)
    }
}
