//! Error types for the org-watch domain.
//!
//! Each port has its own error type ([`FetchError`], [`DeliveryError`],
//! [`PersistenceError`]). [`RunError`] covers the conditions that end a poll
//! cycle with a failure exit; everything else is logged and skipped.

use std::path::PathBuf;

use thiserror::Error;

use crate::{OrgName, Timestamp};

// ---------------------------------------------------------------------------
// Port errors
// ---------------------------------------------------------------------------

/// A read from the source of truth (GitHub) failed.
///
/// All variants are treated as transient: the next scheduled run is the
/// retry. Whether the failure ends the run depends on what was being fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, TLS, timeout, reset).
    #[error("Request to {url} failed: {message}")]
    Transport {
        url: String,
        message: String,
    },

    /// The API answered with a non-success status.
    #[error("Request to {url} returned HTTP {status}")]
    Status {
        url: String,
        status: u16,
    },

    /// The API rate limit is exhausted.
    #[error("Rate limited by {url}{}", .reset_at.as_ref().map(|t| format!(" until {t}")).unwrap_or_default())]
    RateLimited {
        url: String,
        /// When the limit window resets, if the API said so.
        reset_at: Option<Timestamp>,
    },

    /// The response body did not have the expected shape.
    #[error("Unexpected response from {url}: {message}")]
    Decode {
        url: String,
        message: String,
    },
}

/// Posting a message to the chat webhook failed.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The webhook could not be reached.
    #[error("Webhook unreachable: {message}")]
    Transport {
        message: String,
    },

    /// The webhook answered with a non-success status.
    #[error("Webhook returned HTTP {status}: {body}")]
    Status {
        status: u16,
        body: String,
    },

    /// The webhook accepted the request but refused the message.
    #[error("Webhook rejected message (code {code}): {message}")]
    Rejected {
        code: i64,
        message: String,
    },
}

/// Loading or saving the snapshot failed.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot file exists but cannot be parsed.
    #[error("Snapshot {} is unreadable: {message}", .path.display())]
    Corrupt {
        path: PathBuf,
        message: String,
    },

    #[error("Snapshot could not be encoded: {message}")]
    Encode {
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Run-level errors
// ---------------------------------------------------------------------------

/// Errors that end a poll cycle unsuccessfully.
///
/// Per-repository fetch failures and delivery failures are not represented
/// here; they are logged, counted in the run report, and the run carries on.
#[derive(Debug, Error)]
pub enum RunError {
    /// The organization's repository listing could not be read, so there is
    /// nothing meaningful to diff.
    #[error("Could not list repositories of {org}")]
    OrganizationFetch {
        org: OrgName,
        #[source]
        source: FetchError,
    },

    /// The updated snapshot could not be written. The next run will re-notify
    /// whatever this run found.
    #[error("Snapshot could not be saved")]
    Persistence(#[from] PersistenceError),

    /// The run configuration is invalid. Produced before any I/O happens.
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
    },
}
