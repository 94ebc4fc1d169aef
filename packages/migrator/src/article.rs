//! Helpers for preparing article copies: domain rewriting, part titles,
//! external ids and title pattern matching.

use regex::RegexBuilder;

use crate::config::EXTERNAL_ID_PREFIX;
use crate::error::Result;

/// Replace every literal occurrence of `from` with `to`.
///
/// No-op unless both are non-empty.
pub fn rewrite_domains(html: &str, from: &str, to: &str) -> String {
    if from.is_empty() || to.is_empty() {
        return html.to_string();
    }
    html.replace(from, to)
}

/// Title for part `part` (1-based) of a split article.
///
/// The first part keeps the base title; later parts get `template` appended
/// with `{n}` replaced by the part number.
///
/// # Examples
/// ```
/// use blog_migrator::article::part_title;
///
/// assert_eq!(part_title("Guide", 1, " (Part {n})"), "Guide");
/// assert_eq!(part_title("Guide", 2, " (Part {n})"), "Guide (Part 2)");
/// ```
pub fn part_title(base: &str, part: usize, template: &str) -> String {
    if part <= 1 {
        return base.to_string();
    }
    format!("{base}{}", template.replace("{n}", &part.to_string()))
}

/// External id recorded on a migrated article.
pub fn external_id_for(article_id: u64) -> String {
    format!("{EXTERNAL_ID_PREFIX}{article_id}")
}

/// External id for one part of a multi-part article.
pub fn part_external_id(article_id: u64, part: usize) -> String {
    format!("{}:part:{part}", external_id_for(article_id))
}

/// Title filter built from a `*` wildcard pattern.
///
/// Matching is case-insensitive and covers the whole title. An empty
/// pattern matches everything.
#[derive(Debug, Clone)]
pub struct TitlePattern {
    regex: Option<regex::Regex>,
}

impl TitlePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Ok(Self { regex: None });
        }

        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = RegexBuilder::new(&format!("^{body}$"))
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()?;
        Ok(Self { regex: Some(regex) })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.regex.as_ref().is_none_or(|re| re.is_match(text))
    }
}

/// One-off wildcard match of `text` against `pattern`.
///
/// # Examples
/// ```
/// use blog_migrator::article::matches_pattern;
///
/// assert!(matches_pattern("2024-spring-lookbook", "2024-*").unwrap());
/// assert!(matches_pattern("How to: a Tutorial", "*tutorial*").unwrap());
/// assert!(!matches_pattern("Tutorial basics", "*Guide*").unwrap());
/// ```
pub fn matches_pattern(text: &str, pattern: &str) -> Result<bool> {
    Ok(TitlePattern::new(pattern)?.matches(text))
}
