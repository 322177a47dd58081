//! Core domain for org-watch.
//!
//! org-watch polls one GitHub organization for new repositories, releases,
//! and tags and posts a chat message for each one it has not seen before.
//! This crate holds every domain concept used by the rest of the workspace:
//! identifiers, entity types, the snapshot of seen keys, the change detector,
//! run configuration, error types, and the port traits infrastructure crates
//! implement.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype names (`OrgName`, `RepoName`, `TagName`) and `RunId` |
//! | [`types`] | Entities, `EntityKey`, `Timestamp` |
//! | [`snapshot`] | The monotonic set of seen keys |
//! | [`detector`] | `detect_new` and the highlighting `ChangeDetector` |
//! | [`config`] | `WatchConfig` and its policies |
//! | [`errors`] | Port and run-level error types |
//! | [`ports`] | `Fetcher`, `Store`, `Notifier` |

pub mod config;
pub mod detector;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod snapshot;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{DeliveryFailurePolicy, FirstRunPolicy, HighlightPatterns, WatchConfig};
pub use detector::{detect_new, ChangeDetector, Detection};
pub use errors::{DeliveryError, FetchError, PersistenceError, RunError};
pub use identifiers::{OrgName, RepoName, RunId, TagName};
pub use ports::{Fetcher, Message, Notifier, Store};
pub use snapshot::Snapshot;
pub use types::{Entity, EntityKey, EntityKind, Release, Repository, Tag, Timestamp};
