//! Change detection: which observed entities have not been seen before.
//!
//! Pure functions over keys and entities; no I/O and no state between calls.

use std::collections::BTreeSet;

use crate::{Entity, EntityKey, HighlightPatterns, Snapshot};

/// Returns the keys present in `current` but absent from `previous`.
pub fn detect_new(
    current: &BTreeSet<EntityKey>,
    previous: &BTreeSet<EntityKey>,
) -> BTreeSet<EntityKey> {
    current.difference(previous).cloned().collect()
}

/// An entity that was not in the previous snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// The newly observed entity.
    pub entity: Entity,

    /// Set when a release or tag matches a notable-version pattern.
    pub highlighted: bool,
}

impl Detection {
    /// Key of the detected entity.
    pub fn key(&self) -> EntityKey {
        self.entity.key()
    }
}

/// Diffs observed entities against a snapshot and classifies what is new.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    patterns: HighlightPatterns,
}

impl ChangeDetector {
    /// Creates a detector that highlights with `patterns`.
    pub fn new(patterns: HighlightPatterns) -> Self {
        Self { patterns }
    }

    /// Returns `true` if any of the entity's textual fields match a pattern.
    /// Repositories are never highlighted.
    pub fn is_highlighted(&self, entity: &Entity) -> bool {
        entity
            .highlight_candidates()
            .into_iter()
            .any(|text| self.patterns.matches(text))
    }

    /// Returns every entity in `current` whose key is not in `previous`, in the
    /// order given. An entity observed twice in `current` is reported once.
    pub fn detect(&self, current: &[Entity], previous: &Snapshot) -> Vec<Detection> {
        let mut reported = BTreeSet::new();
        current
            .iter()
            .filter(|entity| {
                let key = entity.key();
                !previous.contains(&key) && reported.insert(key)
            })
            .map(|entity| Detection {
                highlighted: self.is_highlighted(entity),
                entity: entity.clone(),
            })
            .collect()
    }
}
