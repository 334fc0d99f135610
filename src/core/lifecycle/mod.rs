//! # Lifecycle Module
//!
//! State machine of one scan attempt, driven by progress events.
//!
//! ```text
//! idle -> scanning -> extracting -> hashing -> grouping -> done | error
//! ```
//!
//! `done` and `error` are terminal for the attempt; only `begin()`
//! starts a new one. Stages outside the canonical order are shown but
//! leave the ordered indicator untouched.

use crate::core::model::ResultSummary;
use crate::core::progress::{ScanProgress, Stage};
use serde::{Deserialize, Serialize};

/// What applying an event did
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// No attempt is running, or it already ended
    Ignored,
    /// A non-terminal stage was applied
    Progressed,
    /// The job finished; the summary is present when the event embedded one
    Completed { summary: Option<ResultSummary> },
    /// The job failed with a backend message
    Failed { message: String },
}

/// State of one entry in the ordered stage indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageState {
    Pending,
    Active,
    Done,
}

/// Coarse status shown in the header badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBadge {
    Idle,
    Scanning,
    Done,
    Error,
}

impl StatusBadge {
    pub fn label(&self) -> &'static str {
        match self {
            StatusBadge::Idle => "Ready",
            StatusBadge::Scanning => "Scanning",
            StatusBadge::Done => "Done",
            StatusBadge::Error => "Error",
        }
    }
}

const DEFAULT_TITLE: &str = "Preparing scan...";

/// Tracks stage, percentage and message of the current scan attempt
#[derive(Debug, Clone)]
pub struct ScanLifecycle {
    stage: Stage,
    ordered_index: Option<usize>,
    percent: Option<u32>,
    message: Option<String>,
    title: &'static str,
}

impl ScanLifecycle {
    pub fn new() -> Self {
        Self {
            stage: Stage::Idle,
            ordered_index: None,
            percent: None,
            message: None,
            title: DEFAULT_TITLE,
        }
    }

    /// Start a new attempt, discarding whatever the previous one showed
    pub fn begin(&mut self) {
        self.stage = Stage::Scanning;
        self.ordered_index = Stage::Scanning.ordered_index();
        self.percent = None;
        self.message = None;
        self.title = Stage::Scanning.title().unwrap_or(DEFAULT_TITLE);
    }

    /// Back to idle (return to the home page)
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Apply one event in arrival order
    pub fn apply(&mut self, event: ScanProgress) -> Transition {
        if matches!(self.stage, Stage::Idle) || self.stage.is_terminal() {
            tracing::trace!(stage = %event.stage, "Ignoring progress outside a running scan");
            return Transition::Ignored;
        }

        if let Some(message) = event.message.as_ref().filter(|m| !m.is_empty()) {
            self.message = Some(message.clone());
        }
        // Keep the previous percentage when the total is unknown
        if let Some(percent) = event.percent() {
            self.percent = Some(percent);
        }
        if let Some(index) = event.stage.ordered_index() {
            self.ordered_index = Some(index);
        }
        if let Some(title) = event.stage.title() {
            self.title = title;
        }

        if event.stage != self.stage && event.stage != Stage::Idle {
            tracing::debug!(from = %self.stage, to = %event.stage, "Scan stage changed");
        }

        match event.stage {
            Stage::Done => {
                self.stage = Stage::Done;
                tracing::info!("Scan finished");
                Transition::Completed {
                    summary: event.summary,
                }
            }
            Stage::Error => {
                self.stage = Stage::Error;
                let message = event
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Unknown error".to_string());
                tracing::info!(%message, "Scan failed");
                Transition::Failed { message }
            }
            // The backend reports idle until the scan request lands
            Stage::Idle => Transition::Progressed,
            stage => {
                self.stage = stage;
                Transition::Progressed
            }
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.stage, Stage::Idle) && !self.stage.is_terminal()
    }

    /// Last known percentage, if any event carried a total
    pub fn percent(&self) -> Option<u32> {
        self.percent
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    /// Position in [`Stage::ORDERED`] of the last ordered stage seen.
    ///
    /// Unordered stages such as `lightroom` leave it unchanged.
    pub fn stage_index(&self) -> Option<usize> {
        self.ordered_index
    }

    /// State of each entry of [`Stage::ORDERED`]
    pub fn stage_states(&self) -> [(Stage, StageState); 4] {
        Stage::ORDERED.map(|stage| {
            let state = match (&self.stage, self.ordered_index, stage.ordered_index()) {
                (Stage::Done, _, _) => StageState::Done,
                (_, Some(current), Some(index)) if index < current => StageState::Done,
                (_, Some(current), Some(index)) if index == current => StageState::Active,
                _ => StageState::Pending,
            };
            (stage, state)
        })
    }

    pub fn badge(&self) -> StatusBadge {
        match self.stage {
            Stage::Idle => StatusBadge::Idle,
            Stage::Done => StatusBadge::Done,
            Stage::Error => StatusBadge::Error,
            _ => StatusBadge::Scanning,
        }
    }
}

impl Default for ScanLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> ScanLifecycle {
        let mut lifecycle = ScanLifecycle::new();
        lifecycle.begin();
        lifecycle
    }

    #[test]
    fn idle_ignores_events() {
        let mut lifecycle = ScanLifecycle::new();

        let transition = lifecycle.apply(ScanProgress::new(Stage::Hashing, 1, 2));

        assert_eq!(transition, Transition::Ignored);
        assert_eq!(lifecycle.stage(), &Stage::Idle);
        assert_eq!(lifecycle.badge(), StatusBadge::Idle);
    }

    #[test]
    fn stages_advance_by_event() {
        let mut lifecycle = running();

        assert_eq!(
            lifecycle.apply(ScanProgress::new(Stage::Grouping, 8, 10)),
            Transition::Progressed
        );
        assert_eq!(lifecycle.stage(), &Stage::Grouping);
        assert_eq!(lifecycle.percent(), Some(80));
        assert_eq!(lifecycle.title(), "Finding similar photos...");
        assert_eq!(lifecycle.badge(), StatusBadge::Scanning);

        let states = lifecycle.stage_states();
        assert_eq!(states[0].1, StageState::Done);
        assert_eq!(states[2].1, StageState::Done);
        assert_eq!(states[3].1, StageState::Active);
    }

    #[test]
    fn zero_total_keeps_previous_percent() {
        let mut lifecycle = running();

        lifecycle.apply(ScanProgress::new(Stage::Hashing, 50, 200));
        lifecycle.apply(ScanProgress::new(Stage::Hashing, 60, 0).with_message("Hashing..."));

        assert_eq!(lifecycle.percent(), Some(25));
        assert_eq!(lifecycle.message(), Some("Hashing..."));
    }

    #[test]
    fn unordered_stage_keeps_indicator() {
        let mut lifecycle = running();

        lifecycle.apply(ScanProgress::new(Stage::Extracting, 1, 4));
        lifecycle.apply(
            ScanProgress::new(Stage::Other("lightroom".to_string()), 3, 4)
                .with_message("Reading catalog"),
        );

        let states = lifecycle.stage_states();
        assert_eq!(states[1].1, StageState::Active);
        assert_eq!(lifecycle.stage_index(), Some(1));
        assert_eq!(lifecycle.percent(), Some(75));
        assert_eq!(lifecycle.message(), Some("Reading catalog"));
        assert_eq!(lifecycle.title(), "Reading Lightroom catalog...");
        assert!(lifecycle.is_running());
    }

    #[test]
    fn done_is_terminal() {
        let mut lifecycle = running();
        let summary = ResultSummary {
            total_photos: 120,
            total_groups: 15,
            ..ResultSummary::default()
        };

        let transition =
            lifecycle.apply(ScanProgress::new(Stage::Done, 0, 0).with_summary(summary.clone()));

        assert_eq!(
            transition,
            Transition::Completed {
                summary: Some(summary)
            }
        );
        assert_eq!(
            lifecycle.apply(ScanProgress::new(Stage::Hashing, 1, 2)),
            Transition::Ignored
        );
        assert_eq!(lifecycle.badge(), StatusBadge::Done);
        assert!(lifecycle
            .stage_states()
            .iter()
            .all(|(_, state)| *state == StageState::Done));
    }

    #[test]
    fn error_carries_message() {
        let mut lifecycle = running();

        let transition =
            lifecycle.apply(ScanProgress::new(Stage::Error, 0, 0).with_message("Disk unplugged"));

        assert_eq!(
            transition,
            Transition::Failed {
                message: "Disk unplugged".to_string()
            }
        );
        assert_eq!(lifecycle.badge(), StatusBadge::Error);
    }

    #[test]
    fn idle_event_does_not_stop_a_running_scan() {
        let mut lifecycle = running();

        assert_eq!(
            lifecycle.apply(ScanProgress::new(Stage::Idle, 0, 0)),
            Transition::Progressed
        );
        assert_eq!(lifecycle.stage(), &Stage::Scanning);
        assert!(lifecycle.is_running());
        assert_eq!(lifecycle.stage_index(), Some(0));

        assert_eq!(
            lifecycle.apply(ScanProgress::new(Stage::Hashing, 1, 2)),
            Transition::Progressed
        );
        assert_eq!(
            lifecycle.apply(ScanProgress::new(Stage::Done, 0, 0)),
            Transition::Completed { summary: None }
        );
        assert_eq!(lifecycle.badge(), StatusBadge::Done);
    }

    #[test]
    fn begin_restarts_after_terminal() {
        let mut lifecycle = running();
        lifecycle.apply(ScanProgress::new(Stage::Error, 0, 0));

        lifecycle.begin();

        assert_eq!(lifecycle.stage(), &Stage::Scanning);
        assert_eq!(lifecycle.percent(), None);
        assert_eq!(
            lifecycle.apply(ScanProgress::new(Stage::Hashing, 1, 4)),
            Transition::Progressed
        );
    }
}
