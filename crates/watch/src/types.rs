//! Entity and key types for the watched organization.
//!
//! Entities are immutable snapshots of what the fetcher observed in one run.
//! Each entity is identified by an [`EntityKey`]; only keys are persisted
//! between runs, the remaining attributes exist for message formatting.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{RepoName, TagName};

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Creates a [`Timestamp`] from seconds since the Unix epoch.
    ///
    /// Returns `None` if `secs` is outside chrono's representable range.
    pub fn from_unix_seconds(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(Self)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A repository owned by the watched organization.
#[derive(Debug, Clone, PartialEq)]
pub struct Repository {
    /// Short repository name; the natural key.
    pub name: RepoName,

    /// `owner/name` form as reported by GitHub.
    pub full_name: String,

    /// Free-text description, if the repository has one.
    pub description: Option<String>,

    /// Primary language detected by GitHub.
    pub language: Option<String>,

    /// Browser URL of the repository.
    pub html_url: String,

    /// When the repository was created.
    pub created_at: Timestamp,
}

/// A published release of a repository.
#[derive(Debug, Clone, PartialEq)]
pub struct Release {
    /// Repository the release belongs to.
    pub repo: RepoName,

    /// Tag the release points at; together with `repo` this is the key.
    pub tag: TagName,

    /// Release title. GitHub allows it to be empty, in which case the tag is
    /// shown instead.
    pub title: Option<String>,

    /// Browser URL of the release page.
    pub html_url: String,

    /// `None` for releases that were never published.
    pub published_at: Option<Timestamp>,

    /// Markdown release notes.
    pub notes: Option<String>,
}

/// A git tag in a repository.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    /// Repository the tag belongs to.
    pub repo: RepoName,

    /// Tag name; together with `repo` this is the key.
    pub name: TagName,

    /// Full commit SHA the tag points at.
    pub commit_sha: String,

    /// API URL of the tagged commit.
    pub commit_url: String,

    /// The tag listing endpoint carries no dates, so this is usually `None`.
    pub created_at: Option<Timestamp>,
}

/// Any entity the fetcher can observe.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    /// A repository of the organization.
    Repository(Repository),
    /// A published release.
    Release(Release),
    /// A git tag.
    Tag(Tag),
}

impl Entity {
    /// Returns the natural key identifying this entity across runs.
    pub fn key(&self) -> EntityKey {
        match self {
            Entity::Repository(r) => EntityKey::Repository {
                name: r.name.clone(),
            },
            Entity::Release(r) => EntityKey::Release {
                repo: r.repo.clone(),
                tag: r.tag.clone(),
            },
            Entity::Tag(t) => EntityKey::Tag {
                repo: t.repo.clone(),
                name: t.name.clone(),
            },
        }
    }

    /// Returns which kind of entity this is.
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Repository(_) => EntityKind::Repository,
            Entity::Release(_) => EntityKind::Release,
            Entity::Tag(_) => EntityKind::Tag,
        }
    }

    /// Text fields consulted when deciding whether the entity is highlighted.
    ///
    /// Repositories have none; releases offer their tag and title; tags offer
    /// their name.
    pub fn highlight_candidates(&self) -> Vec<&str> {
        match self {
            Entity::Repository(_) => Vec::new(),
            Entity::Release(r) => {
                let mut fields = vec![r.tag.as_str()];
                if let Some(title) = r.title.as_deref() {
                    fields.push(title);
                }
                fields
            }
            Entity::Tag(t) => vec![t.name.as_str()],
        }
    }
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// The three kinds of entity that are watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    /// A repository.
    Repository,
    /// A release.
    Release,
    /// A tag.
    Tag,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EntityKind::Repository => "repository",
            EntityKind::Release => "release",
            EntityKind::Tag => "tag",
        };
        f.write_str(s)
    }
}

/// Natural identifier of an entity.
///
/// Two observations with equal keys are the same entity, whatever their other
/// attributes say.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityKey {
    /// A repository, by name.
    Repository { name: RepoName },
    /// A release, by repository and tag.
    Release { repo: RepoName, tag: TagName },
    /// A tag, by repository and tag name.
    Tag { repo: RepoName, name: TagName },
}

impl EntityKey {
    /// Returns the kind of entity this key identifies.
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityKey::Repository { .. } => EntityKind::Repository,
            EntityKey::Release { .. } => EntityKind::Release,
            EntityKey::Tag { .. } => EntityKind::Tag,
        }
    }

    /// Repository the keyed entity belongs to (the repository itself for
    /// [`EntityKey::Repository`]).
    pub fn repo(&self) -> &RepoName {
        match self {
            EntityKey::Repository { name } => name,
            EntityKey::Release { repo, .. } | EntityKey::Tag { repo, .. } => repo,
        }
    }
}

impl std::fmt::Display for EntityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKey::Repository { name } => write!(f, "repository {name}"),
            EntityKey::Release { repo, tag } => write!(f, "release {repo}@{tag}"),
            EntityKey::Tag { repo, name } => write!(f, "tag {repo}@{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(tag: &str, title: Option<&str>) -> Release {
        Release {
            repo: RepoName::new("DeepSeek-V3").unwrap(),
            tag: TagName::new(tag).unwrap(),
            title: title.map(str::to_string),
            html_url: "https://github.com/deepseek-ai/DeepSeek-V3/releases/tag/v1".into(),
            published_at: None,
            notes: None,
        }
    }

    #[test]
    fn release_key_is_repo_and_tag() {
        let entity = Entity::Release(release("v1.0", Some("First")));
        assert_eq!(
            entity.key(),
            EntityKey::Release {
                repo: RepoName::new("DeepSeek-V3").unwrap(),
                tag: TagName::new("v1.0").unwrap(),
            }
        );
        assert_eq!(entity.kind(), EntityKind::Release);
    }

    #[test]
    fn release_offers_tag_and_title_for_highlighting() {
        let entity = Entity::Release(release("v1.0", Some("First")));
        assert_eq!(entity.highlight_candidates(), vec!["v1.0", "First"]);

        let untitled = Entity::Release(release("v1.0", None));
        assert_eq!(untitled.highlight_candidates(), vec!["v1.0"]);
    }

    #[test]
    fn key_display_names_kind_and_owner() {
        let key = EntityKey::Tag {
            repo: RepoName::new("r").unwrap(),
            name: TagName::new("v2").unwrap(),
        };
        assert_eq!(key.to_string(), "tag r@v2");
        assert_eq!(key.repo().as_str(), "r");
    }

    #[test]
    fn timestamp_displays_whole_seconds_in_zulu_form() {
        let dt = DateTime::from_timestamp(1_735_182_245, 123_456_789).unwrap();
        assert_eq!(Timestamp::from_utc(dt).to_string(), "2024-12-26T03:04:05Z");
    }

    #[test]
    fn timestamp_from_unix_seconds() {
        let ts = Timestamp::from_unix_seconds(0).unwrap();
        assert_eq!(ts.to_string(), "1970-01-01T00:00:00Z");
    }
}
