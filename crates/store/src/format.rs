use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use watch::{EntityKey, RepoName, Snapshot, TagName};

/// On-disk shape of a [`Snapshot`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub repositories: BTreeSet<RepoName>,
    #[serde(default)]
    pub releases: BTreeMap<RepoName, BTreeSet<TagName>>,
    #[serde(default)]
    pub tags: BTreeMap<RepoName, BTreeSet<TagName>>,
    /// Repositories recorded by a baseline run whose releases or tags have
    /// not been listed yet.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub unlisted: BTreeSet<RepoName>,
}

impl From<&Snapshot> for SnapshotFile {
    fn from(snapshot: &Snapshot) -> Self {
        let mut file = SnapshotFile::default();
        for key in snapshot.keys() {
            match key.clone() {
                EntityKey::Repository { name } => {
                    file.repositories.insert(name);
                }
                EntityKey::Release { repo, tag } => {
                    file.releases.entry(repo).or_default().insert(tag);
                }
                EntityKey::Tag { repo, name } => {
                    file.tags.entry(repo).or_default().insert(name);
                }
            }
        }
        file.unlisted = snapshot.unlisted().clone();
        file
    }
}

impl From<SnapshotFile> for Snapshot {
    fn from(file: SnapshotFile) -> Self {
        let repositories = file
            .repositories
            .into_iter()
            .map(|name| EntityKey::Repository { name });
        let releases = file.releases.into_iter().flat_map(|(repo, tags)| {
            tags.into_iter().map(move |tag| EntityKey::Release {
                repo: repo.clone(),
                tag,
            })
        });
        let tags = file.tags.into_iter().flat_map(|(repo, names)| {
            names.into_iter().map(move |name| EntityKey::Tag {
                repo: repo.clone(),
                name,
            })
        });
        let mut snapshot: Snapshot = repositories.chain(releases).chain(tags).collect();
        for repo in file.unlisted {
            snapshot.mark_unlisted(repo);
        }
        snapshot
    }
}
