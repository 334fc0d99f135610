//! # Session Module
//!
//! One review session: the results of a scan, the verdicts over them,
//! and the review cursor. Created when a scan starts and dropped as a
//! whole on reset, so results and verdicts are always torn down together.

use crate::core::decisions::{BulkPolicy, DecisionModel, Verdict, VerdictCounts};
use crate::core::model::{Group, GroupId, RecommendationSet, ResultSummary};
use crate::core::navigator::ReviewNavigator;
use crate::core::results::ResultStore;
use crate::error::ReviewError;
use serde::{Deserialize, Serialize};

/// Overview shown by the automatic cleanup panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoPlan {
    pub keep_count: usize,
    pub delete_count: usize,
    pub save_gb: f64,
    pub groups: Vec<AutoPlanGroup>,
}

/// One line of the automatic cleanup panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoPlanGroup {
    pub group_id: GroupId,
    pub photo_count: usize,
    pub keep_count: usize,
    pub delete_count: usize,
    pub save_bytes: u64,
    /// Up to three paths to preview
    pub preview: Vec<String>,
}

/// Results, verdicts and cursor of one scan
#[derive(Debug, Clone, Default)]
pub struct ReviewSession {
    results: ResultStore,
    decisions: DecisionModel,
    navigator: ReviewNavigator,
}

impl ReviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    pub fn decisions(&self) -> &DecisionModel {
        &self.decisions
    }

    pub fn navigator(&self) -> &ReviewNavigator {
        &self.navigator
    }

    pub fn publish_summary(&mut self, summary: ResultSummary) {
        self.results.publish_summary(summary);
    }

    pub fn load_results(&mut self, groups: Vec<Group>, recommendations: Option<RecommendationSet>) {
        self.results.load(groups, recommendations);
        self.navigator = ReviewNavigator::new(self.results.group_count());
    }

    /// Open group-by-group review at the first group.
    ///
    /// Verdicts are reseeded from the recommendations when available.
    pub fn enter_review(&mut self) -> Result<(), ReviewError> {
        if self.results.group_count() == 0 {
            return Err(ReviewError::NoGroups);
        }

        self.navigator.reset();
        if let Some(recommendations) = self.results.recommendations() {
            self.decisions.seed_from_recommendations(recommendations);
        }
        Ok(())
    }

    /// Apply every recommendation and describe the result
    pub fn auto_plan(&mut self) -> Result<AutoPlan, ReviewError> {
        let recommendations = self
            .results
            .recommendations()
            .ok_or(ReviewError::RecommendationsNotReady)?;
        let summary = self.results.summary().cloned().unwrap_or_default();

        let mut groups = Vec::new();
        for recommendation in recommendations {
            let Some(group) = self.results.find_group(&recommendation.group_id) else {
                continue;
            };

            groups.push(AutoPlanGroup {
                group_id: group.group_id.clone(),
                photo_count: group.len(),
                keep_count: recommendation.keep_count,
                delete_count: recommendation.delete_count,
                save_bytes: recommendation.save_bytes,
                preview: group.photos.iter().take(3).map(|p| p.path.clone()).collect(),
            });
            self.decisions.apply_recommendation(recommendation);
        }

        Ok(AutoPlan {
            keep_count: summary.keep_count,
            delete_count: summary.delete_count,
            save_gb: summary.save_gb,
            groups,
        })
    }

    /// Group under the review cursor
    pub fn current_group(&self) -> Option<&Group> {
        self.navigator.current(self.results.groups())
    }

    pub fn position_label(&self) -> Option<String> {
        self.navigator.position_label(self.results.groups())
    }

    pub fn next_group(&mut self) -> bool {
        self.navigator.next()
    }

    pub fn previous_group(&mut self) -> bool {
        self.navigator.previous()
    }

    pub fn verdict(&self, path: &str) -> Verdict {
        self.decisions.get(path)
    }

    pub fn toggle(&mut self, path: &str) -> Verdict {
        self.decisions.toggle(path)
    }

    pub fn set_verdict(&mut self, path: &str, verdict: Verdict) {
        self.decisions.set(path, verdict);
    }

    /// Apply a bulk policy to the current group
    pub fn bulk_apply(&mut self, policy: BulkPolicy) -> Result<(), ReviewError> {
        let group = self
            .navigator
            .current(self.results.groups())
            .ok_or(ReviewError::NoGroups)?;
        self.decisions.bulk_apply(group, policy)
    }

    pub fn counts(&self) -> VerdictCounts {
        self.decisions.counts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Photo, Recommendation};

    fn photo(path: &str, is_edited: bool) -> Photo {
        Photo {
            path: path.to_string(),
            size: 1_000,
            is_edited,
            is_flagged: false,
            rating: 0,
            pick: 0,
        }
    }

    fn loaded_session() -> ReviewSession {
        let groups = vec![
            Group {
                group_id: GroupId::new("0"),
                count: 2,
                total_size: 2_000,
                photos: vec![photo("/a.jpg", false), photo("/b.jpg", false)],
            },
            Group {
                group_id: GroupId::new("1"),
                count: 2,
                total_size: 2_000,
                photos: vec![photo("/c.jpg", false), photo("/d.jpg", true)],
            },
        ];
        let recommendations = RecommendationSet {
            summary: ResultSummary {
                total_photos: 4,
                total_groups: 2,
                keep_count: 2,
                delete_count: 2,
                save_bytes: 2_000,
                save_gb: 0.0,
            },
            recommendations: vec![
                Recommendation {
                    group_id: GroupId::new("0"),
                    total_in_group: 2,
                    keep: vec!["/a.jpg".to_string()],
                    delete: vec!["/b.jpg".to_string()],
                    keep_count: 1,
                    delete_count: 1,
                    save_bytes: 1_000,
                },
                Recommendation {
                    group_id: GroupId::new("1"),
                    total_in_group: 2,
                    keep: vec!["/d.jpg".to_string()],
                    delete: vec!["/c.jpg".to_string()],
                    keep_count: 1,
                    delete_count: 1,
                    save_bytes: 1_000,
                },
            ],
        };

        let mut session = ReviewSession::new();
        session.load_results(groups, Some(recommendations));
        session
    }

    #[test]
    fn review_requires_groups() {
        let mut session = ReviewSession::new();
        session.load_results(vec![], None);

        assert_eq!(session.enter_review(), Err(ReviewError::NoGroups));
        assert!(session.current_group().is_none());
        assert_eq!(session.bulk_apply(BulkPolicy::All), Err(ReviewError::NoGroups));
    }

    #[test]
    fn entering_review_seeds_and_rewinds() {
        let mut session = loaded_session();
        session.next_group();

        session.enter_review().unwrap();

        assert_eq!(session.navigator().index(), 0);
        assert_eq!(session.verdict("/a.jpg"), Verdict::Keep);
        assert_eq!(session.verdict("/c.jpg"), Verdict::Delete);
        assert_eq!(
            session.position_label().as_deref(),
            Some("Group 1 / 2 (2 photos)")
        );
    }

    #[test]
    fn bulk_apply_targets_current_group() {
        let mut session = loaded_session();
        session.enter_review().unwrap();
        session.next_group();

        session.bulk_apply(BulkPolicy::All).unwrap();

        assert_eq!(session.verdict("/c.jpg"), Verdict::Keep);
        assert_eq!(session.verdict("/b.jpg"), Verdict::Delete);
    }

    #[test]
    fn auto_plan_needs_recommendations() {
        let mut session = ReviewSession::new();
        session.load_results(vec![], None);

        assert_eq!(
            session.auto_plan(),
            Err(ReviewError::RecommendationsNotReady)
        );
    }

    #[test]
    fn auto_plan_applies_every_recommendation() {
        let mut session = loaded_session();
        session.set_verdict("/a.jpg", Verdict::Delete);

        let plan = session.auto_plan().unwrap();

        assert_eq!(plan.groups.len(), 2);
        assert_eq!(plan.delete_count, 2);
        assert_eq!(plan.groups[1].preview, vec!["/c.jpg", "/d.jpg"]);
        assert_eq!(session.verdict("/a.jpg"), Verdict::Keep);
        assert_eq!(session.counts(), VerdictCounts { keep: 2, delete: 2 });
    }
}
