//! Run configuration.
//!
//! [`WatchConfig`] is built once by the composition root and handed to the
//! monitor; nothing in the domain reads the environment.

use crate::{OrgName, RunError};

/// What to do when no previous snapshot could be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirstRunPolicy {
    /// Record everything currently visible without notifying.
    #[default]
    Baseline,
    /// Notify every entity currently visible.
    ReportAll,
}

/// What to do with an entity whose notification could not be delivered.
///
/// The snapshot is saved in both cases; the policy only decides whether the
/// failed entity's key goes into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryFailurePolicy {
    /// Leave the key out so the next run sends the notification again.
    #[default]
    Retry,
    /// Record the key anyway; the notification is lost.
    MarkSeen,
}

/// Case-insensitive substrings that mark a release or tag as notable.
///
/// Only [`HighlightPatterns::new`] builds a set, so every stored pattern is
/// trimmed and lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightPatterns(Vec<String>);

impl HighlightPatterns {
    /// Builds a pattern set. Empty and whitespace-only patterns are dropped
    /// since they would match everything.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            patterns
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        )
    }

    /// A set that never matches.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Returns `true` if any pattern occurs in `text`, ignoring case.
    pub fn matches(&self, text: &str) -> bool {
        if self.0.is_empty() {
            return false;
        }
        let text = text.to_lowercase();
        self.0.iter().any(|p| text.contains(p.as_str()))
    }

    /// The normalized patterns.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for HighlightPatterns {
    fn default() -> Self {
        Self::new(["v3", "r2"])
    }
}

/// Configuration for one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// Organization whose repositories are watched.
    pub organization: OrgName,

    /// Patterns that mark a release or tag as highlighted.
    pub highlight: HighlightPatterns,

    /// Behaviour when no previous snapshot exists.
    pub first_run: FirstRunPolicy,

    /// Behaviour when a notification cannot be delivered.
    pub delivery_failure: DeliveryFailurePolicy,
}

impl WatchConfig {
    /// Creates a configuration with default policies and highlight patterns.
    pub fn new(organization: OrgName) -> Self {
        Self {
            organization,
            highlight: HighlightPatterns::default(),
            first_run: FirstRunPolicy::default(),
            delivery_failure: DeliveryFailurePolicy::default(),
        }
    }

    /// Parses an organization login and builds a default configuration from it.
    pub fn for_organization(org: &str) -> Result<Self, RunError> {
        let organization = OrgName::new(org.trim()).ok_or_else(|| RunError::Configuration {
            message: "organization name must not be empty".to_string(),
        })?;
        Ok(Self::new(organization))
    }

    /// Replaces the highlight patterns.
    pub fn with_highlight(mut self, highlight: HighlightPatterns) -> Self {
        self.highlight = highlight;
        self
    }

    /// Sets the first-run policy.
    pub fn with_first_run(mut self, policy: FirstRunPolicy) -> Self {
        self.first_run = policy;
        self
    }

    /// Sets the delivery-failure policy.
    pub fn with_delivery_failure(mut self, policy: DeliveryFailurePolicy) -> Self {
        self.delivery_failure = policy;
        self
    }
}
