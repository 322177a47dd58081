//! Port traits implemented by infrastructure crates.
//!
//! The monitor only ever talks to these traits. `github` supplies the
//! [`Fetcher`], `store` the [`Store`], and `webhook` the [`Notifier`].

use async_trait::async_trait;

use crate::{
    DeliveryError, FetchError, PersistenceError, Release, RepoName, Repository, Snapshot, Tag,
};

/// Reads the current state of the watched organization.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Lists every repository of the organization.
    async fn list_repositories(&self) -> Result<Vec<Repository>, FetchError>;

    /// Lists the published releases of `repo`.
    async fn list_releases(&self, repo: &RepoName) -> Result<Vec<Release>, FetchError>;

    /// Lists the tags of `repo`.
    async fn list_tags(&self, repo: &RepoName) -> Result<Vec<Tag>, FetchError>;
}

/// Loads and saves the snapshot of seen keys.
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns the saved snapshot, or `None` if nothing has been saved yet.
    async fn load(&self) -> Result<Option<Snapshot>, PersistenceError>;

    /// Replaces the saved snapshot with `snapshot`.
    async fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError>;
}

/// A formatted chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub body: String,
}

impl Message {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// The plain-text form sent to the chat: title, blank line, body.
    pub fn text(&self) -> String {
        format!("{}\n\n{}", self.title, self.body)
    }
}

/// Delivers messages to the chat.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &Message) -> Result<(), DeliveryError>;
}
