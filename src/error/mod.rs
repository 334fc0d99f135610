//! # Error Module
//!
//! User-facing error types for the review client.
//!
//! ## Design Principles
//! - **Never panic** on backend data - return errors instead
//! - **Include context** - endpoint, detail message, group id
//! - **Absorb what doesn't block** - transport hiccups in the progress
//!   channel are logged, not returned
//! - **Surface what does** - scan start, result fetch and delete failures

use thiserror::Error;

/// Top-level client error
#[derive(Error, Debug)]
pub enum ReviewClientError {
    #[error("Backend error: {0}")]
    Transport(#[from] TransportError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    #[error("Delete error: {0}")]
    Delete(#[from] DeleteError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors talking to the backend
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Cannot reach server at {endpoint}: {reason}")]
    Unreachable { endpoint: String, reason: String },

    #[error("Server rejected {endpoint} ({status}): {detail}")]
    Status {
        endpoint: String,
        status: u16,
        detail: String,
    },

    #[error("Unexpected response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("Progress stream unavailable: {0}")]
    PushUnavailable(String),
}

/// Errors around starting and running a scan job
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Please enter the photo folder to scan")]
    EmptyDirectory,

    #[error("Scan could not be started: {detail}")]
    Rejected { detail: String },

    #[error("Cannot reach the scanning server: {reason}")]
    Unreachable { reason: String },

    #[error("Scan failed: {message}")]
    JobFailed { message: String },
}

/// Local rejections while reviewing results
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    #[error("No similar photo groups were found")]
    NoGroups,

    #[error("No edited photos in group {group_id}. Check that the Lightroom catalog was found and its edit records are available locally.")]
    NoEditedPhotos { group_id: String },

    #[error("Recommendations are not ready yet")]
    RecommendationsNotReady,

    #[error("No scan results are loaded")]
    NoSession,
}

/// Errors committing the delete set
#[derive(Error, Debug)]
pub enum DeleteError {
    #[error("No photos are marked for deletion")]
    NothingSelected,

    #[error("A delete request is already in progress")]
    AlreadyInFlight,

    #[error("Delete failed: {0}")]
    Request(#[source] TransportError),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, ReviewClientError>;
