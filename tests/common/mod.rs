//! Shared fixtures for the workflow integration tests.
//!
//! `StubBackend` answers every endpoint from canned data and records what
//! it was asked; `ChannelPush` hands out push streams the test feeds by hand.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::StreamExt;
use photo_review_client::core::backend::{
    Backend, DeleteFailure, DeleteResponse, PickFolderResponse, PushConnector, PushStream,
    ScanRequest, StatusResponse, StatusSource,
};
use photo_review_client::core::config::ClientConfig;
use photo_review_client::core::model::{
    Group, GroupId, Photo, Recommendation, RecommendationSet, ResultSummary,
};
use photo_review_client::core::workflow::Workflow;
use photo_review_client::error::TransportError;
use photo_review_client::events::{Event, EventChannel, EventReceiver};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Default)]
pub struct StubBackend {
    pub start_error: Mutex<Option<TransportError>>,
    pub statuses: Mutex<VecDeque<StatusResponse>>,
    pub groups: Vec<Group>,
    pub groups_error: Mutex<Option<TransportError>>,
    pub recommendations: Option<RecommendationSet>,
    pub recommendations_error: Mutex<Option<TransportError>>,
    pub delete_reply: Mutex<Option<Result<DeleteResponse, TransportError>>>,
    pub folder: Option<PickFolderResponse>,
    pub reset_fails: bool,

    pub scan_requests: Mutex<Vec<ScanRequest>>,
    pub delete_calls: Mutex<Vec<Vec<String>>>,
    pub groups_calls: AtomicUsize,
    pub reset_calls: AtomicUsize,
}

impl StubBackend {
    pub fn scans_started(&self) -> usize {
        self.scan_requests.lock().unwrap().len()
    }

    pub fn deletes(&self) -> Vec<Vec<String>> {
        self.delete_calls.lock().unwrap().clone()
    }
}

fn refused(endpoint: &str) -> TransportError {
    TransportError::Unreachable {
        endpoint: endpoint.to_string(),
        reason: "connection refused".to_string(),
    }
}

#[async_trait]
impl StatusSource for StubBackend {
    async fn scan_status(&self) -> Result<StatusResponse, TransportError> {
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| refused("scan/status"))
    }
}

#[async_trait]
impl Backend for StubBackend {
    async fn start_scan(&self, request: &ScanRequest) -> Result<(), TransportError> {
        self.scan_requests.lock().unwrap().push(request.clone());
        match self.start_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn groups(&self) -> Result<Vec<Group>, TransportError> {
        self.groups_calls.fetch_add(1, Ordering::SeqCst);
        match self.groups_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(self.groups.clone()),
        }
    }

    async fn recommendations(&self) -> Result<Option<RecommendationSet>, TransportError> {
        match self.recommendations_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(self.recommendations.clone()),
        }
    }

    async fn delete(&self, paths: &[String]) -> Result<DeleteResponse, TransportError> {
        self.delete_calls.lock().unwrap().push(paths.to_vec());
        match self.delete_reply.lock().unwrap().take() {
            Some(reply) => reply,
            None => Ok(DeleteResponse {
                deleted: paths.to_vec(),
                deleted_count: paths.len(),
                error_count: 0,
                errors: vec![],
            }),
        }
    }

    async fn pick_folder(&self) -> Result<PickFolderResponse, TransportError> {
        self.folder.clone().ok_or_else(|| refused("pick-folder"))
    }

    async fn thumbnail(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        Err(TransportError::Status {
            endpoint: format!("thumbnail?path={}", path),
            status: 404,
            detail: "Not Found".to_string(),
        })
    }

    async fn reset(&self) -> Result<(), TransportError> {
        self.reset_calls.fetch_add(1, Ordering::SeqCst);
        if self.reset_fails {
            Err(refused("reset"))
        } else {
            Ok(())
        }
    }
}

/// Hands out one hand-fed push stream per `open`, then refuses
#[derive(Default)]
pub struct ChannelPush {
    streams: Mutex<VecDeque<mpsc::UnboundedReceiver<String>>>,
    opened: AtomicUsize,
}

impl ChannelPush {
    /// A connector that always refuses, forcing the polling fallback
    pub fn refusing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a stream for the next `open` and return its feeding end
    pub fn add_stream(&self) -> mpsc::UnboundedSender<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.streams.lock().unwrap().push_back(rx);
        tx
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PushConnector for ChannelPush {
    async fn open(&self) -> Result<PushStream, TransportError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let rx = self
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::PushUnavailable("refused".to_string()))?;

        Ok(futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|text| (Ok(text), rx))
        })
        .boxed())
    }
}

pub fn workflow(
    backend: &Arc<StubBackend>,
    push: &Arc<ChannelPush>,
) -> (Workflow<StubBackend>, EventReceiver) {
    let config = ClientConfig::builder()
        .poll_interval(Duration::from_millis(50))
        .build()
        .unwrap();
    let (sender, receiver) = EventChannel::new();
    let workflow = Workflow::new(config, backend.clone(), push.clone(), sender);
    (workflow, receiver)
}

pub fn photo(path: &str, size: u64) -> Photo {
    Photo {
        path: path.to_string(),
        size,
        is_edited: false,
        is_flagged: false,
        rating: 0,
        pick: 0,
    }
}

pub fn group(id: &str, photos: Vec<Photo>) -> Group {
    Group {
        group_id: GroupId::new(id),
        count: photos.len(),
        total_size: photos.iter().map(|p| p.size).sum(),
        photos,
    }
}

pub fn recommendation(id: &str, keep: &[&str], delete: &[&str], save_bytes: u64) -> Recommendation {
    Recommendation {
        group_id: GroupId::new(id),
        total_in_group: keep.len() + delete.len(),
        keep: keep.iter().map(|s| s.to_string()).collect(),
        delete: delete.iter().map(|s| s.to_string()).collect(),
        keep_count: keep.len(),
        delete_count: delete.len(),
        save_bytes,
    }
}

pub fn summary(total_groups: usize, keep_count: usize, delete_count: usize) -> ResultSummary {
    ResultSummary {
        total_photos: keep_count + delete_count,
        total_groups,
        keep_count,
        delete_count,
        save_bytes: 0,
        save_gb: 0.0,
    }
}

/// Two groups: one with three deletable photos, one pair
pub fn two_groups() -> (Vec<Group>, RecommendationSet) {
    let groups = vec![
        group(
            "0",
            vec![
                photo("/photos/keep.dng", 1_000_000),
                photo("/photos/a.dng", 1_000_000),
                photo("/photos/b.dng", 1_000_000),
                photo("/photos/c.dng", 500),
            ],
        ),
        group(
            "1",
            vec![photo("/photos/d.dng", 10), photo("/photos/e.dng", 10)],
        ),
    ];
    let recommendations = RecommendationSet {
        summary: summary(2, 2, 3),
        recommendations: vec![
            recommendation(
                "0",
                &["/photos/keep.dng"],
                &["/photos/a.dng", "/photos/b.dng", "/photos/c.dng"],
                2_000_500,
            ),
            recommendation("1", &["/photos/d.dng", "/photos/e.dng"], &[], 0),
        ],
    };
    (groups, recommendations)
}

pub fn delete_failure(path: &str, error: &str) -> DeleteFailure {
    DeleteFailure {
        path: path.to_string(),
        error: error.to_string(),
    }
}

pub fn status(stage: &str, progress: u64, total: u64) -> StatusResponse {
    StatusResponse {
        status: stage.to_string(),
        progress,
        total,
        message: String::new(),
        current_file: None,
    }
}

pub fn frame(stage: &str, progress: u64, total: u64) -> String {
    format!(
        r#"{{"stage": "{}", "progress": {}, "total": {}}}"#,
        stage, progress, total
    )
}

pub fn drain(receiver: &EventReceiver) -> Vec<Event> {
    receiver.drain()
}
