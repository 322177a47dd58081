//! org-watch GitHub infrastructure adapter.
//!
//! Implements the [`watch::Fetcher`] trait over the GitHub REST API with
//! [`reqwest`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules.
//! All GitHub API details (authentication, pagination, rate-limit detection,
//! response shapes) are handled here; the [`watch`] crate never sees them.
//!
//! ## Endpoints
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | `list_repositories` | `GET /orgs/{org}/repos` |
//! | `list_releases` | `GET /repos/{org}/{repo}/releases` (drafts dropped) |
//! | `list_tags` | `GET /repos/{org}/{repo}/tags` |
//!
//! Every listing is paginated at 100 items per page up to
//! [`GithubConfig::max_pages`].

mod client;
mod config;
mod models;

pub use client::{GithubFetcher, PER_PAGE};
pub use config::{GithubConfig, DEFAULT_API_URL};
