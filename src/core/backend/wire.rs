//! Request and response bodies of the backend API.

use crate::core::model::{Group, ResultSummary};
use serde::{Deserialize, Serialize};

/// Body of `POST /scan`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub directory: String,
    pub threshold: u32,
    pub include_images: bool,
    /// Optional Lightroom catalog to cross-reference edits against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lrcat_path: Option<String>,
}

impl ScanRequest {
    pub fn new(directory: impl Into<String>, threshold: u32) -> Self {
        Self {
            directory: directory.into(),
            threshold,
            include_images: false,
            lrcat_path: None,
        }
    }

    pub fn include_images(mut self, include: bool) -> Self {
        self.include_images = include;
        self
    }

    pub fn lrcat_path(mut self, path: impl Into<String>) -> Self {
        self.lrcat_path = Some(path.into());
        self
    }
}

/// Response of `GET /scan/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub progress: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub current_file: Option<String>,
}

/// A text frame of the progress WebSocket
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PushFrame {
    pub stage: String,
    #[serde(default)]
    pub progress: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub summary: Option<ResultSummary>,
}

/// Response of `GET /groups`
#[derive(Debug, Clone, Deserialize)]
pub struct GroupsResponse {
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// Body of `POST /delete`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteRequest<'a> {
    pub paths: &'a [String],
}

/// Response of `POST /delete`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub deleted: Vec<String>,
    #[serde(default)]
    pub deleted_count: usize,
    #[serde(default)]
    pub error_count: usize,
    #[serde(default)]
    pub errors: Vec<DeleteFailure>,
}

/// A path the backend could not move to the recycle bin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFailure {
    pub path: String,
    pub error: String,
}

/// Response of `GET /pick-folder`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PickFolderResponse {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub fallback: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body FastAPI-style backends send with 4xx replies
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}
