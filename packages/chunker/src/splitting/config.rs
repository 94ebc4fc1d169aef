//! Chunker configuration: size budget, oversize policy and the set of
//! identifier attributes that must stay unique across fragments.

use std::fmt;
use std::str::FromStr;

use crate::error::{ChunkError, Result};

/// Attributes whose values must be unique within a rendered document.
///
/// Stripped from every wrapper clone except the first one emitted for a
/// source element.
pub const DEFAULT_IDENTIFIER_ATTRIBUTES: &[&str] = &[
    "id",
    "data-id",
    "data-section-id",
    "data-block-id",
    "data-component-id",
];

/// Minimum position of a whitespace split point, as a fraction of the budget.
pub const DEFAULT_BOUNDARY_RATIO: f64 = 0.7;

/// What to do with an atomic element that exceeds its budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OversizePolicy {
    /// Emit the element alone as an oversized fragment and warn.
    #[default]
    PassThrough,

    /// Omit the element and warn.
    Drop,

    /// Fail chunking with `ChunkError::BudgetExceeded`.
    Reject,
}

impl OversizePolicy {
    /// Configuration name of this policy.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PassThrough => "pass-through",
            Self::Drop => "drop",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for OversizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OversizePolicy {
    type Err = ChunkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pass-through" | "passthrough" | "pass_through" => Ok(Self::PassThrough),
            "drop" => Ok(Self::Drop),
            "reject" => Ok(Self::Reject),
            _ => Err(ChunkError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Configuration for a [`Chunker`](super::Chunker).
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkerConfig {
    /// Maximum serialized length of a fragment, in characters.
    pub max_chars: usize,

    /// Handling of atomic elements larger than their budget.
    pub policy: OversizePolicy,

    /// Identifier attributes deduplicated across wrapper clones.
    pub identifier_attributes: Vec<String>,

    /// Minimum whitespace split position as a fraction of the budget.
    pub boundary_ratio: f64,
}

impl ChunkerConfig {
    /// Create a configuration with the given budget and default settings.
    ///
    /// # Errors
    /// Returns `ChunkError::InvalidBudget` when `max_chars` is zero.
    ///
    /// # Examples
    /// ```
    /// use html_chunker::splitting::ChunkerConfig;
    ///
    /// assert!(ChunkerConfig::new(240_000).is_ok());
    /// assert!(ChunkerConfig::new(0).is_err());
    /// ```
    pub fn new(max_chars: usize) -> Result<Self> {
        if max_chars == 0 {
            return Err(ChunkError::InvalidBudget(max_chars));
        }

        Ok(Self {
            max_chars,
            policy: OversizePolicy::default(),
            identifier_attributes: DEFAULT_IDENTIFIER_ATTRIBUTES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            boundary_ratio: DEFAULT_BOUNDARY_RATIO,
        })
    }

    /// Set the oversize policy.
    #[must_use]
    pub fn with_policy(mut self, policy: OversizePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the identifier attribute set.
    #[must_use]
    pub fn with_identifier_attributes(
        mut self,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.identifier_attributes = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the whitespace boundary ratio, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn with_boundary_ratio(mut self, ratio: f64) -> Self {
        self.boundary_ratio = ratio.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ChunkerConfig::new(100).unwrap();
        assert_eq!(config.max_chars, 100);
        assert_eq!(config.policy, OversizePolicy::PassThrough);
        assert!(config.identifier_attributes.contains(&"id".to_string()));
        assert!((config.boundary_ratio - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_rejects_zero_budget() {
        assert!(matches!(
            ChunkerConfig::new(0),
            Err(ChunkError::InvalidBudget(0))
        ));
    }

    #[test]
    fn test_config_builders() {
        let config = ChunkerConfig::new(50)
            .unwrap()
            .with_policy(OversizePolicy::Reject)
            .with_identifier_attributes(["id", "name"])
            .with_boundary_ratio(1.5);

        assert_eq!(config.policy, OversizePolicy::Reject);
        assert_eq!(config.identifier_attributes, vec!["id", "name"]);
        assert!((config.boundary_ratio - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "pass-through".parse::<OversizePolicy>().unwrap(),
            OversizePolicy::PassThrough
        );
        assert_eq!(" DROP ".parse::<OversizePolicy>().unwrap(), OversizePolicy::Drop);
        assert_eq!("reject".parse::<OversizePolicy>().unwrap(), OversizePolicy::Reject);
        assert!("truncate".parse::<OversizePolicy>().is_err());
    }

    #[test]
    fn test_policy_display_round_trips() {
        for policy in [
            OversizePolicy::PassThrough,
            OversizePolicy::Drop,
            OversizePolicy::Reject,
        ] {
            assert_eq!(policy.to_string().parse::<OversizePolicy>().unwrap(), policy);
        }
    }
}
