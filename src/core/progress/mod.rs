//! # Progress Module
//!
//! Normalized progress events of the backend scan job, and the channel
//! that delivers them.
//!
//! ## Transports
//! - **Push** - WebSocket frames `{stage, progress, total, message, summary}`
//! - **Poll** - `GET /scan/status` once per interval, `status` maps onto `stage`
//!
//! Both surface the same [`ScanProgress`] shape.

mod channel;

pub use channel::{ProgressChannel, ProgressSubscription, Transport};

use crate::core::backend::{PushFrame, StatusResponse};
use crate::core::model::ResultSummary;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named phase of the backend job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Stage {
    Idle,
    Scanning,
    Extracting,
    Hashing,
    Grouping,
    Done,
    Error,
    /// Backend-specific stage outside the canonical order (e.g. `lightroom`)
    Other(String),
}

impl Stage {
    /// Stages shown in the ordered progress indicator
    pub const ORDERED: [Stage; 4] = [
        Stage::Scanning,
        Stage::Extracting,
        Stage::Hashing,
        Stage::Grouping,
    ];

    pub fn parse(value: &str) -> Self {
        match value {
            "idle" => Stage::Idle,
            "scanning" => Stage::Scanning,
            "extracting" => Stage::Extracting,
            "hashing" => Stage::Hashing,
            "grouping" => Stage::Grouping,
            "done" => Stage::Done,
            "error" => Stage::Error,
            other => Stage::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Stage::Idle => "idle",
            Stage::Scanning => "scanning",
            Stage::Extracting => "extracting",
            Stage::Hashing => "hashing",
            Stage::Grouping => "grouping",
            Stage::Done => "done",
            Stage::Error => "error",
            Stage::Other(name) => name,
        }
    }

    /// `done` or `error`: the end of a scan attempt
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done | Stage::Error)
    }

    /// Position in [`Stage::ORDERED`], if any
    pub fn ordered_index(&self) -> Option<usize> {
        Self::ORDERED.iter().position(|s| s == self)
    }

    /// Heading shown while the stage is running
    pub fn title(&self) -> Option<&'static str> {
        match self {
            Stage::Scanning => Some("Scanning files..."),
            Stage::Extracting => Some("Extracting thumbnails..."),
            Stage::Hashing => Some("Computing image fingerprints..."),
            Stage::Grouping => Some("Finding similar photos..."),
            Stage::Other(name) if name == "lightroom" => Some("Reading Lightroom catalog..."),
            _ => None,
        }
    }
}

impl From<String> for Stage {
    fn from(value: String) -> Self {
        Stage::parse(&value)
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        stage.as_str().to_string()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized progress event. Each event replaces the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanProgress {
    pub stage: Stage,
    pub progress: u64,
    pub total: u64,
    pub message: Option<String>,
    /// Result totals, only on a terminal `done` event
    pub summary: Option<ResultSummary>,
}

impl ScanProgress {
    pub fn new(stage: Stage, progress: u64, total: u64) -> Self {
        Self {
            stage,
            progress,
            total,
            message: None,
            summary: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_summary(mut self, summary: ResultSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Decode a push frame
    pub fn from_push_frame(text: &str) -> Result<Self, serde_json::Error> {
        let frame: PushFrame = serde_json::from_str(text)?;
        Ok(frame.into())
    }

    /// `round(progress / total * 100)`, or `None` when total is zero
    pub fn percent(&self) -> Option<u32> {
        if self.total == 0 {
            return None;
        }
        let percent = (self.progress as f64 / self.total as f64 * 100.0).round();
        Some(percent.clamp(0.0, u32::MAX as f64) as u32)
    }
}

impl From<PushFrame> for ScanProgress {
    fn from(frame: PushFrame) -> Self {
        Self {
            stage: Stage::parse(&frame.stage),
            progress: frame.progress.unwrap_or(0),
            total: frame.total.unwrap_or(0),
            message: frame.message.filter(|m| !m.is_empty()),
            summary: frame.summary,
        }
    }
}

impl From<StatusResponse> for ScanProgress {
    fn from(status: StatusResponse) -> Self {
        Self {
            stage: Stage::parse(&status.status),
            progress: status.progress,
            total: status.total,
            message: Some(status.message).filter(|m| !m.is_empty()),
            summary: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds() {
        assert_eq!(ScanProgress::new(Stage::Hashing, 50, 200).percent(), Some(25));
        assert_eq!(ScanProgress::new(Stage::Grouping, 8, 10).percent(), Some(80));
        assert_eq!(ScanProgress::new(Stage::Hashing, 1, 3).percent(), Some(33));
        assert_eq!(ScanProgress::new(Stage::Hashing, 2, 3).percent(), Some(67));
    }

    #[test]
    fn percent_is_absent_without_total() {
        assert_eq!(ScanProgress::new(Stage::Scanning, 40, 0).percent(), None);
    }

    #[test]
    fn unknown_stages_are_unordered() {
        let stage = Stage::parse("lightroom");

        assert_eq!(stage, Stage::Other("lightroom".to_string()));
        assert_eq!(stage.ordered_index(), None);
        assert!(!stage.is_terminal());
        assert_eq!(stage.title(), Some("Reading Lightroom catalog..."));
        assert_eq!(Stage::parse("hashing").ordered_index(), Some(2));
    }

    #[test]
    fn push_frame_normalizes() {
        let event = ScanProgress::from_push_frame(
            r#"{"stage": "grouping", "progress": 8, "total": 10, "message": ""}"#,
        )
        .unwrap();

        assert_eq!(event.stage, Stage::Grouping);
        assert_eq!(event.progress, 8);
        assert_eq!(event.message, None);
    }

    #[test]
    fn status_maps_onto_stage() {
        let status = StatusResponse {
            status: "error".to_string(),
            progress: 0,
            total: 0,
            message: "Disk unplugged".to_string(),
            current_file: None,
        };
        let event = ScanProgress::from(status);

        assert_eq!(event.stage, Stage::Error);
        assert!(event.stage.is_terminal());
        assert_eq!(event.message.as_deref(), Some("Disk unplugged"));
    }

    #[test]
    fn terminal_frame_carries_summary() {
        let event = ScanProgress::from_push_frame(
            r#"{"stage": "done", "summary": {"total_photos": 120, "total_groups": 15, "delete_count": 40, "save_gb": 3.2}}"#,
        )
        .unwrap();

        let summary = event.summary.unwrap();
        assert_eq!(summary.total_photos, 120);
        assert_eq!(summary.total_groups, 15);
        assert_eq!(summary.delete_count, 40);
        assert_eq!(summary.save_gb, 3.2);
    }
}
