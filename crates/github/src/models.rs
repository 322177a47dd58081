//! Partial GitHub API response shapes and their conversion into domain types.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use watch::{Release, RepoName, Repository, Tag, TagName, Timestamp};

#[derive(Debug, Deserialize)]
pub(crate) struct RepoResponse {
    name: String,
    full_name: String,
    description: Option<String>,
    language: Option<String>,
    html_url: String,
    created_at: DateTime<Utc>,
}

impl RepoResponse {
    pub(crate) fn into_domain(self) -> Option<Repository> {
        Some(Repository {
            name: RepoName::new(self.name)?,
            full_name: self.full_name,
            description: self.description,
            language: self.language,
            html_url: self.html_url,
            created_at: Timestamp::from_utc(self.created_at),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReleaseResponse {
    tag_name: String,
    name: Option<String>,
    html_url: String,
    published_at: Option<DateTime<Utc>>,
    body: Option<String>,
    #[serde(default)]
    pub(crate) draft: bool,
}

impl ReleaseResponse {
    pub(crate) fn into_domain(self, repo: &RepoName) -> Option<Release> {
        Some(Release {
            repo: repo.clone(),
            tag: TagName::new(self.tag_name)?,
            title: self.name.filter(|n| !n.is_empty()),
            html_url: self.html_url,
            published_at: self.published_at.map(Timestamp::from_utc),
            notes: self.body,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagResponse {
    name: String,
    commit: CommitRef,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
    url: String,
}

impl TagResponse {
    pub(crate) fn into_domain(self, repo: &RepoName) -> Option<Tag> {
        Some(Tag {
            repo: repo.clone(),
            name: TagName::new(self.name)?,
            commit_sha: self.commit.sha,
            commit_url: self.commit.url,
            created_at: None,
        })
    }
}
