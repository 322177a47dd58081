//! org-watch poll cycle.
//!
//! [`Monitor`] sequences one run: load the previous snapshot, list the
//! organization through the [`watch::Fetcher`], diff with the
//! [`watch::ChangeDetector`], post one message per new entity through the
//! [`watch::Notifier`], and save the grown snapshot through the
//! [`watch::Store`].
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The monitor sequences calls between the domain in
//! [`watch`] and the infrastructure traits. It owns the run policies (first
//! run, delivery failure) but no I/O of its own.
//!
//! ## Messages
//!
//! One message is sent per new entity, in discovery order: each repository,
//! then its releases, then its tags. [`format`] holds the message layout.

pub mod format;
pub mod monitor;

pub use format::format_detection;
pub use monitor::{Monitor, RunReport};
