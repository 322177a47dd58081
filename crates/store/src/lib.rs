//! org-watch snapshot persistence.
//!
//! Implements the [`watch::Store`] trait over a single JSON file.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** The on-disk format and write strategy live here; the
//! [`watch`] crate sees only [`watch::Snapshot`].
//!
//! ## File format
//!
//! One object mapping entity kind to seen keys, sorted so that successive
//! snapshots diff cleanly:
//!
//! ```json
//! {
//!   "repositories": ["DeepSeek-V3", "FlashMLA"],
//!   "releases": { "DeepSeek-V3": ["v1.0.0"] },
//!   "tags": { "DeepSeek-V3": ["v1.0.0", "v1.0.1"] }
//! }
//! ```
//!
//! An optional `"unlisted"` array names repositories recorded by a baseline
//! run whose releases or tags could not be listed. Files written before the
//! section existed load with it empty.

mod file;
mod format;

pub use file::JsonFileStore;
pub use format::SnapshotFile;
