//! Backend trait definitions.

use super::wire::{DeleteResponse, PickFolderResponse, ScanRequest, StatusResponse};
use crate::core::model::{Group, RecommendationSet};
use crate::error::TransportError;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Raw text frames from the progress push endpoint
pub type PushStream = BoxStream<'static, Result<String, TransportError>>;

/// Source of job status snapshots, used by the polling fallback
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the current job status
    async fn scan_status(&self) -> Result<StatusResponse, TransportError>;
}

/// Request/response operations of the scanning backend
#[async_trait]
pub trait Backend: StatusSource {
    /// Start a scan job
    ///
    /// A rejected request carries the server's `detail` in
    /// [`TransportError::Status`].
    async fn start_scan(&self, request: &ScanRequest) -> Result<(), TransportError>;

    /// Fetch every duplicate group of the finished scan
    async fn groups(&self) -> Result<Vec<Group>, TransportError>;

    /// Fetch the recommendations of the finished scan
    ///
    /// Returns `None` when the scan produced no recommendations.
    async fn recommendations(&self) -> Result<Option<RecommendationSet>, TransportError>;

    /// Move the given paths to the recycle bin as a single batch
    async fn delete(&self, paths: &[String]) -> Result<DeleteResponse, TransportError>;

    /// Ask the server to show a native folder dialog
    async fn pick_folder(&self) -> Result<PickFolderResponse, TransportError>;

    /// Fetch thumbnail bytes for a photo
    async fn thumbnail(&self, path: &str) -> Result<Vec<u8>, TransportError>;

    /// Tear down the server-side session
    async fn reset(&self) -> Result<(), TransportError>;
}

/// Opens the progress push stream
#[async_trait]
pub trait PushConnector: Send + Sync {
    /// Establish the connection
    ///
    /// Errors here are connection-level failures; the caller falls back
    /// to polling.
    async fn open(&self) -> Result<PushStream, TransportError>;
}
