//! Event type definitions for the review workflow.

use crate::core::decisions::Verdict;
use crate::core::lifecycle::StatusBadge;
use crate::core::model::ResultSummary;
use crate::core::progress::Transport;
use serde::{Deserialize, Serialize};

/// All events emitted by the review workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Scan job events
    Scan(ScanEvent),
    /// Review events
    Review(ReviewEvent),
    /// Delete events
    Delete(DeleteEvent),
    /// Workflow-level events
    Workflow(WorkflowEvent),
}

/// Events while a scan job runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// The scan was requested
    Started { directory: String },
    /// Progress is arriving over a (new) transport
    Connected { transport: Transport },
    /// A progress event was applied
    Progress(ProgressUpdate),
    /// The job finished; the summary may arrive before the full results
    Completed { summary: Option<ResultSummary> },
    /// Groups and recommendations were fetched
    ResultsLoaded {
        group_count: usize,
        summary: Option<ResultSummary>,
    },
    /// The job failed
    Failed { message: String },
}

/// What the progress page shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Stage name as the backend reports it
    pub stage: String,
    /// Heading for the stage
    pub title: String,
    /// Last known percentage
    pub percent: Option<u32>,
    /// Last backend message
    pub message: Option<String>,
    pub badge: StatusBadge,
}

/// Events while reviewing groups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReviewEvent {
    /// A group is now under the cursor
    GroupShown { index: usize, group_count: usize },
    /// A photo's verdict changed
    VerdictChanged { path: String, verdict: Verdict },
    /// Several verdicts changed at once
    VerdictsChanged { keep: usize, delete: usize },
}

/// Events around committing deletions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeleteEvent {
    /// The batch was submitted
    Started { count: usize },
    /// The backend replied
    Completed {
        deleted_count: usize,
        error_count: usize,
        freed_bytes: u64,
    },
    /// The request failed; review state is intact
    Failed { message: String },
}

/// Pages of the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// Choose a folder and start a scan
    Scan,
    /// Scan is running
    Progress,
    /// Summary and review
    Results,
    /// Deletion finished
    Complete,
}

/// Panels of the results page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    /// Group-by-group review
    Review,
    /// Apply all recommendations at once
    Auto,
}

/// Workflow-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WorkflowEvent {
    /// The visible page changed
    PageChanged { page: Page },
    /// A blocking, user-visible error
    Error { message: String },
    /// The session was torn down
    Reset,
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Page::Scan => write!(f, "Scan"),
            Page::Progress => write!(f, "Progress"),
            Page::Results => write!(f, "Results"),
            Page::Complete => write!(f, "Complete"),
        }
    }
}
