//! # Workflow Module
//!
//! Ties the components into the interactive flow:
//!
//! 1. `start_scan` - new session, new progress connection, `POST /scan`
//! 2. `run_until_settled` - apply progress in arrival order until done/error
//! 3. `load_results` - fetch groups and recommendations, open review
//! 4. `toggle` / `bulk_apply` / `next_group` - edit verdicts
//! 5. `prepare_delete` + `commit_delete` - confirm and commit
//! 6. `reset` - tear everything down and return home
//!
//! The workflow owns the session and the progress channel; nothing else
//! reaches into them.

mod types;

pub use types::{FolderChoice, ScanOutcome, Thumbnail};

use crate::core::backend::{Backend, PickFolderResponse, PushConnector, ScanRequest, StatusSource};
use crate::core::config::ClientConfig;
use crate::core::decisions::{BulkPolicy, Verdict};
use crate::core::delete::{DeleteCoordinator, DeleteOutcome, DeletePlan};
use crate::core::lifecycle::{ScanLifecycle, Transition};
use crate::core::model::{Group, ResultSummary};
use crate::core::progress::{ProgressChannel, ProgressSubscription, ScanProgress, Transport};
use crate::core::session::{AutoPlan, ReviewSession};
use crate::error::{DeleteError, Result, ReviewClientError, ReviewError, ScanError, TransportError};
use crate::events::{
    DeleteEvent, Event, EventSender, Page, Panel, ProgressUpdate, ReviewEvent, ScanEvent,
    WorkflowEvent,
};
use std::sync::Arc;

/// The review workflow controller
pub struct Workflow<B: Backend + 'static> {
    config: ClientConfig,
    backend: Arc<B>,
    push: Arc<dyn PushConnector>,
    events: EventSender,
    channel: ProgressChannel,
    progress: Option<ProgressSubscription>,
    lifecycle: ScanLifecycle,
    session: Option<ReviewSession>,
    deleter: DeleteCoordinator,
    page: Page,
    panel: Option<Panel>,
}

impl<B: Backend + 'static> Workflow<B> {
    pub fn new(
        config: ClientConfig,
        backend: Arc<B>,
        push: Arc<dyn PushConnector>,
        events: EventSender,
    ) -> Self {
        let channel = ProgressChannel::new(config.poll_interval);
        Self {
            config,
            backend,
            push,
            events,
            channel,
            progress: None,
            lifecycle: ScanLifecycle::new(),
            session: None,
            deleter: DeleteCoordinator::new(),
            page: Page::Scan,
            panel: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn panel(&self) -> Option<Panel> {
        self.panel
    }

    pub fn lifecycle(&self) -> &ScanLifecycle {
        &self.lifecycle
    }

    /// The current session, if a scan has been started
    pub fn session(&self) -> Option<&ReviewSession> {
        self.session.as_ref()
    }

    pub fn summary(&self) -> Option<&ResultSummary> {
        self.session.as_ref().and_then(|s| s.results().summary())
    }

    /// Transport of the live progress connection
    pub fn transport(&self) -> Option<Transport> {
        self.channel.transport()
    }

    /// A scan request for `directory` with the configured defaults
    pub fn scan_request(&self, directory: impl Into<String>) -> ScanRequest {
        ScanRequest::new(directory, self.config.default_threshold)
            .include_images(self.config.include_images)
    }

    /// Start a new scan, superseding any previous one.
    ///
    /// The previous progress connection is torn down before the new one
    /// is opened, and the previous session is discarded.
    pub async fn start_scan(&mut self, request: ScanRequest) -> Result<()> {
        if request.directory.trim().is_empty() {
            return Err(ScanError::EmptyDirectory.into());
        }

        self.disconnect_progress();
        self.session = Some(ReviewSession::new());
        self.panel = None;
        self.lifecycle.begin();
        self.show(Page::Progress);
        self.emit(Event::Scan(ScanEvent::Started {
            directory: request.directory.clone(),
        }));
        self.emit_progress();

        let status: Arc<dyn StatusSource> = self.backend.clone();
        let transport = self.channel.connect(self.push.clone(), status).await;
        self.progress = self.channel.subscribe();
        self.emit(Event::Scan(ScanEvent::Connected { transport }));

        if let Err(e) = self.backend.start_scan(&request).await {
            let error: ReviewClientError = match e {
                TransportError::Status { detail, .. } => ScanError::Rejected { detail }.into(),
                TransportError::Unreachable { reason, .. } => ScanError::Unreachable { reason }.into(),
                other => other.into(),
            };
            self.disconnect_progress();
            self.session = None;
            self.lifecycle.reset();
            self.fail_to_scan_page(&error);
            return Err(error);
        }

        Ok(())
    }

    /// Wait for the next progress event and apply it.
    ///
    /// Returns `Ok(None)` once the connection has ended. After a
    /// `Completed` transition the caller fetches results with
    /// [`Workflow::load_results`].
    pub async fn pump(&mut self) -> Result<Option<Transition>> {
        let next = match self.progress.as_mut() {
            Some(subscription) => subscription.recv().await,
            None => return Ok(None),
        };

        match next {
            Some(event) => self.handle_progress(event).map(Some),
            None => {
                self.progress = None;
                Ok(None)
            }
        }
    }

    /// Apply progress until the scan settles, then load its results.
    ///
    /// `Interrupted` means progress stopped arriving (e.g. polling gave
    /// up); the last known progress stays on screen.
    pub async fn run_until_settled(&mut self) -> Result<ScanOutcome> {
        loop {
            match self.pump().await? {
                Some(Transition::Completed { .. }) => {
                    self.load_results().await?;
                    return Ok(ScanOutcome::Completed);
                }
                Some(_) => continue,
                None => {
                    tracing::debug!("Progress ended before the scan settled");
                    return Ok(ScanOutcome::Interrupted);
                }
            }
        }
    }

    /// Apply one progress event to the lifecycle
    pub fn handle_progress(&mut self, event: ScanProgress) -> Result<Transition> {
        let transition = self.lifecycle.apply(event);

        match &transition {
            Transition::Ignored => {}
            Transition::Progressed => self.emit_progress(),
            Transition::Completed { summary } => {
                self.emit_progress();
                self.disconnect_progress();
                self.emit(Event::Scan(ScanEvent::Completed {
                    summary: summary.clone(),
                }));

                // Show the embedded summary right away; full results follow
                if let Some(summary) = summary.clone() {
                    if let Some(session) = self.session.as_mut() {
                        session.publish_summary(summary);
                    }
                    self.show(Page::Results);
                }
            }
            Transition::Failed { message } => {
                self.disconnect_progress();
                self.session = None;
                self.emit(Event::Scan(ScanEvent::Failed {
                    message: message.clone(),
                }));

                let error: ReviewClientError = ScanError::JobFailed {
                    message: message.clone(),
                }
                .into();
                self.fail_to_scan_page(&error);
                return Err(error);
            }
        }

        Ok(transition)
    }

    /// Fetch groups and recommendations and open review.
    pub async fn load_results(&mut self) -> Result<()> {
        let fetched = futures::try_join!(self.backend.groups(), self.backend.recommendations());

        let (groups, recommendations) = match fetched {
            Ok(fetched) => fetched,
            Err(e) => {
                let error: ReviewClientError = e.into();
                self.session = None;
                self.lifecycle.reset();
                self.fail_to_scan_page(&error);
                return Err(error);
            }
        };

        let session = self.session.get_or_insert_with(ReviewSession::new);
        session.load_results(groups, recommendations);
        let group_count = session.results().group_count();
        let summary = session.results().summary().cloned();

        self.emit(Event::Scan(ScanEvent::ResultsLoaded {
            group_count,
            summary,
        }));
        self.show(Page::Results);

        if group_count > 0 {
            self.enter_review()?;
        }
        Ok(())
    }

    /// Open group-by-group review at the first group
    pub fn enter_review(&mut self) -> std::result::Result<(), ReviewError> {
        let session = self.session.as_mut().ok_or(ReviewError::NoSession)?;
        session.enter_review()?;

        let group_count = session.results().group_count();
        let counts = session.counts();
        self.panel = Some(Panel::Review);
        self.emit(Event::Review(ReviewEvent::GroupShown {
            index: 0,
            group_count,
        }));
        self.emit(Event::Review(ReviewEvent::VerdictsChanged {
            keep: counts.keep,
            delete: counts.delete,
        }));
        Ok(())
    }

    /// Apply every recommendation and open the automatic cleanup panel
    pub fn enter_auto_mode(&mut self) -> std::result::Result<AutoPlan, ReviewError> {
        let session = self.session.as_mut().ok_or(ReviewError::RecommendationsNotReady)?;
        let plan = session.auto_plan()?;

        let counts = session.counts();
        self.panel = Some(Panel::Auto);
        self.emit(Event::Review(ReviewEvent::VerdictsChanged {
            keep: counts.keep,
            delete: counts.delete,
        }));
        Ok(plan)
    }

    /// Hide the review and auto panels
    pub fn close_panel(&mut self) {
        self.panel = None;
    }

    pub fn current_group(&self) -> Option<&Group> {
        self.session.as_ref().and_then(|s| s.current_group())
    }

    /// Move to the next group; no-op at the last one
    pub fn next_group(&mut self) -> bool {
        let moved = self.session.as_mut().is_some_and(|s| s.next_group());
        if moved {
            self.emit_group_shown();
        }
        moved
    }

    /// Move to the previous group; no-op at the first one
    pub fn previous_group(&mut self) -> bool {
        let moved = self.session.as_mut().is_some_and(|s| s.previous_group());
        if moved {
            self.emit_group_shown();
        }
        moved
    }

    pub fn verdict(&self, path: &str) -> Verdict {
        self.session
            .as_ref()
            .map_or(Verdict::Undecided, |s| s.verdict(path))
    }

    /// Toggle one photo's verdict
    pub fn toggle(&mut self, path: &str) -> std::result::Result<Verdict, ReviewError> {
        let session = self.session.as_mut().ok_or(ReviewError::NoSession)?;
        let verdict = session.toggle(path);
        self.emit(Event::Review(ReviewEvent::VerdictChanged {
            path: path.to_string(),
            verdict,
        }));
        Ok(verdict)
    }

    /// Apply a bulk policy to the current group
    pub fn bulk_apply(&mut self, policy: BulkPolicy) -> std::result::Result<(), ReviewError> {
        let session = self.session.as_mut().ok_or(ReviewError::NoSession)?;
        session.bulk_apply(policy)?;

        let counts = session.counts();
        self.emit(Event::Review(ReviewEvent::VerdictsChanged {
            keep: counts.keep,
            delete: counts.delete,
        }));
        Ok(())
    }

    /// Collect the delete set for confirmation
    pub fn prepare_delete(&self) -> std::result::Result<DeletePlan, DeleteError> {
        match self.session.as_ref() {
            Some(session) => self.deleter.prepare(session.decisions()),
            None => Err(DeleteError::NothingSelected),
        }
    }

    /// Commit a confirmed plan.
    ///
    /// The `&mut self` borrow keeps a second commit from starting while
    /// this one is outstanding.
    ///
    /// On success the Complete page is shown. On failure the review state
    /// is left as it was so the user can retry.
    pub async fn commit_delete(&mut self, plan: &DeletePlan) -> Result<DeleteOutcome> {
        let Some(session) = self.session.as_ref() else {
            return Err(DeleteError::NothingSelected.into());
        };

        self.emit(Event::Delete(DeleteEvent::Started {
            count: plan.count(),
        }));
        let committed = self
            .deleter
            .commit(plan, self.backend.as_ref(), session.results())
            .await;

        match committed {
            Ok(outcome) => {
                self.emit(Event::Delete(DeleteEvent::Completed {
                    deleted_count: outcome.deleted_count,
                    error_count: outcome.error_count,
                    freed_bytes: outcome.freed_bytes,
                }));
                self.panel = None;
                self.show(Page::Complete);
                Ok(outcome)
            }
            Err(e) => {
                self.emit(Event::Delete(DeleteEvent::Failed {
                    message: e.to_string(),
                }));
                self.emit(Event::Workflow(WorkflowEvent::Error {
                    message: e.to_string(),
                }));
                Err(e.into())
            }
        }
    }

    /// Ask the backend for a native folder dialog
    pub async fn pick_folder(&self) -> FolderChoice {
        match self.backend.pick_folder().await {
            Ok(PickFolderResponse {
                path: Some(path), ..
            }) if !path.trim().is_empty() => FolderChoice::Picked(path),
            Ok(response) => {
                tracing::debug!(
                    fallback = response.fallback,
                    message = response.message.as_deref().unwrap_or(""),
                    "No folder picked"
                );
                FolderChoice::ManualEntry
            }
            Err(e) => {
                tracing::debug!(error = %e, "Folder picker unavailable");
                FolderChoice::ManualEntry
            }
        }
    }

    /// Thumbnail for a photo, or the placeholder when it cannot be loaded
    pub async fn thumbnail(&self, path: &str) -> Thumbnail {
        match self.backend.thumbnail(path).await {
            Ok(bytes) if !bytes.is_empty() => Thumbnail::Image(bytes),
            Ok(_) => Thumbnail::Placeholder,
            Err(e) => {
                tracing::debug!(%path, error = %e, "Thumbnail unavailable");
                Thumbnail::Placeholder
            }
        }
    }

    /// Tear down the session and return to the Scan page.
    ///
    /// The server-side reset is best effort.
    pub async fn reset(&mut self) {
        self.disconnect_progress();

        if let Err(e) = self.backend.reset().await {
            tracing::debug!(error = %e, "Reset request failed, ignoring");
        }

        self.session = None;
        self.panel = None;
        self.lifecycle.reset();
        self.emit(Event::Workflow(WorkflowEvent::Reset));
        self.show(Page::Scan);
    }

    fn emit(&self, event: Event) {
        self.events.send(event);
    }

    fn show(&mut self, page: Page) {
        if self.page != page {
            self.page = page;
            self.emit(Event::Workflow(WorkflowEvent::PageChanged { page }));
        }
    }

    fn emit_progress(&self) {
        self.emit(Event::Scan(ScanEvent::Progress(ProgressUpdate {
            stage: self.lifecycle.stage().to_string(),
            title: self.lifecycle.title().to_string(),
            percent: self.lifecycle.percent(),
            message: self.lifecycle.message().map(str::to_string),
            badge: self.lifecycle.badge(),
        })));
    }

    fn emit_group_shown(&self) {
        if let Some(session) = self.session.as_ref() {
            self.emit(Event::Review(ReviewEvent::GroupShown {
                index: session.navigator().index(),
                group_count: session.navigator().group_count(),
            }));
        }
    }

    fn disconnect_progress(&mut self) {
        self.channel.disconnect();
        self.progress = None;
    }

    fn fail_to_scan_page(&mut self, error: &ReviewClientError) {
        tracing::warn!(%error, "Returning to the scan page");
        self.emit(Event::Workflow(WorkflowEvent::Error {
            message: error.to_string(),
        }));
        self.panel = None;
        self.show(Page::Scan);
    }
}

impl<B: Backend + 'static> std::fmt::Debug for Workflow<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workflow")
            .field("page", &self.page)
            .field("panel", &self.panel)
            .field("stage", self.lifecycle.stage())
            .field("channel", &self.channel)
            .field("has_session", &self.session.is_some())
            .finish()
    }
}
