//! The set of entity keys seen by previous runs.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{EntityKey, RepoName};

/// Keys of every entity seen as of the last successful run.
///
/// A snapshot only grows: there is no way to remove a key, so an
/// entity deleted upstream and later re-created under the same key is not
/// reported twice.
///
/// Alongside the keys it carries the *unlisted* repositories: repositories
/// recorded during a baseline run whose releases or tags could not be
/// listed. Their existing releases and tags are still part of the baseline
/// and are recorded silently the first time their listing succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    keys: BTreeSet<EntityKey>,
    #[serde(default)]
    unlisted: BTreeSet<RepoName>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `key` was seen by a previous run.
    pub fn contains(&self, key: &EntityKey) -> bool {
        self.keys.contains(key)
    }

    /// Records `key`. Returns `true` if it was not already present.
    pub fn insert(&mut self, key: EntityKey) -> bool {
        self.keys.insert(key)
    }

    /// All recorded keys, in key order.
    pub fn keys(&self) -> &BTreeSet<EntityKey> {
        &self.keys
    }

    /// Number of recorded keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no key has been recorded.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns `true` if every key in `other` is also in `self`.
    pub fn is_superset(&self, other: &Snapshot) -> bool {
        self.keys.is_superset(&other.keys)
    }

    /// Returns `true` if `repo` still awaits its baseline listing.
    pub fn is_unlisted(&self, repo: &RepoName) -> bool {
        self.unlisted.contains(repo)
    }

    /// Marks `repo` as awaiting its baseline listing.
    pub fn mark_unlisted(&mut self, repo: RepoName) {
        self.unlisted.insert(repo);
    }

    /// Clears the pending baseline of `repo`. Returns `true` if it was pending.
    pub fn mark_listed(&mut self, repo: &RepoName) -> bool {
        self.unlisted.remove(repo)
    }

    /// Repositories still awaiting their baseline listing.
    pub fn unlisted(&self) -> &BTreeSet<RepoName> {
        &self.unlisted
    }
}

impl FromIterator<EntityKey> for Snapshot {
    fn from_iter<T: IntoIterator<Item = EntityKey>>(iter: T) -> Self {
        Self {
            keys: iter.into_iter().collect(),
            unlisted: BTreeSet::new(),
        }
    }
}

impl Extend<EntityKey> for Snapshot {
    fn extend<T: IntoIterator<Item = EntityKey>>(&mut self, iter: T) {
        self.keys.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(value: &str) -> RepoName {
        RepoName::new(value).unwrap()
    }

    fn repo(value: &str) -> EntityKey {
        EntityKey::Repository { name: name(value) }
    }

    #[test]
    fn insert_reports_novelty() {
        let mut snapshot = Snapshot::new();
        assert!(snapshot.insert(repo("a")));
        assert!(!snapshot.insert(repo("a")));
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn extended_snapshot_is_superset_of_previous() {
        let before: Snapshot = [repo("a"), repo("b")].into_iter().collect();
        let mut after = before.clone();
        after.extend([repo("c")]);
        assert!(after.is_superset(&before));
        assert!(!before.is_superset(&after));
    }

    #[test]
    fn listing_clears_a_pending_baseline_once() {
        let mut snapshot = Snapshot::new();
        snapshot.mark_unlisted(name("c"));
        assert!(snapshot.is_unlisted(&name("c")));

        assert!(snapshot.mark_listed(&name("c")));
        assert!(!snapshot.mark_listed(&name("c")));
        assert!(!snapshot.is_unlisted(&name("c")));
    }

    #[test]
    fn unlisted_repositories_do_not_affect_key_order() {
        let mut before: Snapshot = [repo("a")].into_iter().collect();
        before.mark_unlisted(name("a"));
        let mut after = before.clone();
        after.mark_listed(&name("a"));
        assert!(after.is_superset(&before));
        assert_eq!(after.keys(), before.keys());
    }
}
