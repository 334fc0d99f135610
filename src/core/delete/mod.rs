//! # Delete Module
//!
//! Commits the delete set to the backend and reconciles what actually
//! happened.
//!
//! ## Flow
//! 1. `prepare` collects every path marked delete (empty = rejected locally)
//! 2. The caller confirms using the plan's count
//! 3. `commit` sends one batch request and sums freed bytes from the
//!    stored results, not from the server
//!
//! Only one commit may be in flight at a time.

use crate::core::backend::{Backend, DeleteFailure, DeleteResponse};
use crate::core::decisions::DecisionModel;
use crate::core::model::format_file_size;
use crate::core::results::ResultStore;
use crate::error::DeleteError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// Paths about to be deleted, awaiting confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePlan {
    paths: Vec<String>,
}

impl DeletePlan {
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn count(&self) -> usize {
        self.paths.len()
    }

    /// Question to put to the user before committing
    pub fn confirmation_prompt(&self) -> String {
        format!(
            "About to delete {} photos (moved to the recycle bin). Continue?",
            self.count()
        )
    }
}

/// Result of a committed delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    /// Paths the backend reports as deleted
    pub deleted: Vec<String>,
    pub deleted_count: usize,
    pub error_count: usize,
    pub failures: Vec<DeleteFailure>,
    /// Sum of the stored sizes of every deleted path
    pub freed_bytes: u64,
}

impl DeleteOutcome {
    /// Reconcile a backend reply against the stored results
    pub fn reconcile(response: DeleteResponse, results: &ResultStore) -> Self {
        let freed_bytes = response
            .deleted
            .iter()
            .filter_map(|path| results.size_of(path))
            .sum();

        Self {
            deleted_count: response.deleted_count,
            error_count: response.error_count,
            deleted: response.deleted,
            failures: response.errors,
            freed_bytes,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.error_count > 0
    }

    /// Summary shown on the completion page
    pub fn completion_message(&self) -> String {
        let mut message = format!(
            "Cleaned up {} photos, freed {}",
            self.deleted_count,
            format_file_size(self.freed_bytes)
        );
        if self.has_failures() {
            message.push_str(&format!(
                "\n({} files could not be deleted)",
                self.error_count
            ));
        }
        message
    }
}

/// Submits delete sets, one at a time
#[derive(Debug, Default)]
pub struct DeleteCoordinator {
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the commit settles, however it settles
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl DeleteCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the delete set; an empty set never reaches the backend
    pub fn prepare(&self, decisions: &DecisionModel) -> Result<DeletePlan, DeleteError> {
        let paths = decisions.delete_set();
        if paths.is_empty() {
            return Err(DeleteError::NothingSelected);
        }
        Ok(DeletePlan { paths })
    }

    /// Whether a commit is currently outstanding
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Send the plan as one batch and reconcile the reply
    pub async fn commit<B: Backend + ?Sized>(
        &self,
        plan: &DeletePlan,
        backend: &B,
        results: &ResultStore,
    ) -> Result<DeleteOutcome, DeleteError> {
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(DeleteError::AlreadyInFlight)?;

        tracing::info!(count = plan.count(), "Submitting delete request");
        let response = backend
            .delete(plan.paths())
            .await
            .map_err(DeleteError::Request)?;

        let outcome = DeleteOutcome::reconcile(response, results);
        if outcome.has_failures() {
            tracing::warn!(
                deleted = outcome.deleted_count,
                failed = outcome.error_count,
                "Delete finished with failures"
            );
        } else {
            tracing::info!(
                deleted = outcome.deleted_count,
                freed_bytes = outcome.freed_bytes,
                "Delete finished"
            );
        }
        Ok(outcome)
    }
}
