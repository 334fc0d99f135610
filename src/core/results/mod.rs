//! # Results Module
//!
//! Holds the fetched groups, recommendations and summary of a finished
//! scan. Nothing here is mutated after loading except by replacing the
//! whole result set.

use crate::core::model::{Group, GroupId, Recommendation, RecommendationSet, ResultSummary};
use std::collections::HashMap;

/// Scan results for one review session
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    summary: Option<ResultSummary>,
    groups: Vec<Group>,
    recommendations: Option<Vec<Recommendation>>,
    sizes: HashMap<String, u64>,
    loaded: bool,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a summary before the full results arrive
    ///
    /// A summary from a full load is never replaced by a later partial one.
    pub fn publish_summary(&mut self, summary: ResultSummary) {
        if !self.loaded {
            self.summary = Some(summary);
        }
    }

    /// Replace the stored results with a fetched set
    pub fn load(&mut self, groups: Vec<Group>, recommendations: Option<RecommendationSet>) {
        self.sizes = groups
            .iter()
            .flat_map(|g| g.photos.iter())
            .map(|p| (p.path.clone(), p.size))
            .collect();
        self.groups = groups;

        match recommendations {
            Some(set) => {
                self.summary = Some(set.summary);
                self.recommendations = Some(set.recommendations);
            }
            None => self.recommendations = None,
        }
        self.loaded = true;

        tracing::debug!(
            groups = self.groups.len(),
            photos = self.sizes.len(),
            "Scan results loaded"
        );
    }

    pub fn summary(&self) -> Option<&ResultSummary> {
        self.summary.as_ref()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn find_group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| &g.group_id == id)
    }

    /// `None` until recommendations have been fetched
    pub fn recommendations(&self) -> Option<&[Recommendation]> {
        self.recommendations.as_deref()
    }

    /// Byte size of a photo in any group
    pub fn size_of(&self, path: &str) -> Option<u64> {
        self.sizes.get(path).copied()
    }

    /// Whether groups and recommendations have been fetched
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Photo;

    fn photo(path: &str, size: u64) -> Photo {
        Photo {
            path: path.to_string(),
            size,
            is_edited: false,
            is_flagged: false,
            rating: 0,
            pick: 0,
        }
    }

    fn sample_groups() -> Vec<Group> {
        vec![Group {
            group_id: GroupId::new("0"),
            count: 2,
            total_size: 3_000,
            photos: vec![photo("/a.jpg", 2_000), photo("/b.jpg", 1_000)],
        }]
    }

    #[test]
    fn load_indexes_sizes() {
        let mut store = ResultStore::new();
        store.load(sample_groups(), None);

        assert!(store.is_loaded());
        assert_eq!(store.size_of("/a.jpg"), Some(2_000));
        assert_eq!(store.size_of("/missing.jpg"), None);
        assert!(store.recommendations().is_none());
        assert!(store.find_group(&GroupId::new("0")).is_some());
    }

    #[test]
    fn optimistic_summary_is_replaced_by_full_load() {
        let mut store = ResultStore::new();
        store.publish_summary(ResultSummary {
            total_photos: 120,
            ..ResultSummary::default()
        });
        assert_eq!(store.summary().unwrap().total_photos, 120);

        store.load(
            sample_groups(),
            Some(RecommendationSet {
                summary: ResultSummary {
                    total_photos: 2,
                    delete_count: 1,
                    ..ResultSummary::default()
                },
                recommendations: vec![],
            }),
        );
        store.publish_summary(ResultSummary::default());

        assert_eq!(store.summary().unwrap().total_photos, 2);
        assert_eq!(store.recommendations().map(|r| r.len()), Some(0));
    }
}
