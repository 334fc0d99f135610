//! # Decisions Module
//!
//! The per-photo keep/delete verdicts. This map is the single source of
//! truth for what gets deleted.
//!
//! ## Toggle Cycle
//! | Current   | After toggle |
//! |-----------|--------------|
//! | undecided | keep         |
//! | keep      | delete       |
//! | delete    | keep         |

use crate::core::model::{Group, Recommendation};
use crate::error::ReviewError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Decision state of a single photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Keep,
    Delete,
    Undecided,
}

impl Verdict {
    /// Next verdict in the toggle cycle
    pub fn toggled(self) -> Self {
        match self {
            Verdict::Keep => Verdict::Delete,
            Verdict::Delete => Verdict::Keep,
            Verdict::Undecided => Verdict::Keep,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Keep => "keep",
            Verdict::Delete => "delete",
            Verdict::Undecided => "undecided",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bulk operation over every photo of one group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkPolicy {
    /// Keep every photo
    All,
    /// Keep the first photo, delete the rest
    First,
    /// Keep edited photos, delete the rest
    Edited,
}

/// Keep/delete tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictCounts {
    pub keep: usize,
    pub delete: usize,
}

/// Mapping from photo path to verdict
#[derive(Debug, Clone, Default)]
pub struct DecisionModel {
    verdicts: HashMap<String, Verdict>,
}

impl DecisionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every verdict with the recommended partition
    pub fn seed_from_recommendations(&mut self, recommendations: &[Recommendation]) {
        self.verdicts.clear();
        for recommendation in recommendations {
            self.apply_recommendation(recommendation);
        }
    }

    /// Mark one recommendation's keep and delete sets without clearing
    /// other verdicts
    pub fn apply_recommendation(&mut self, recommendation: &Recommendation) {
        for path in &recommendation.keep {
            self.verdicts.insert(path.clone(), Verdict::Keep);
        }
        for path in &recommendation.delete {
            self.verdicts.insert(path.clone(), Verdict::Delete);
        }
    }

    /// Verdict of a photo; photos never decided are `Undecided`
    pub fn get(&self, path: &str) -> Verdict {
        match self.verdicts.get(path) {
            Some(verdict) => *verdict,
            None => Verdict::Undecided,
        }
    }

    /// Overwrite a photo's verdict
    pub fn set(&mut self, path: impl Into<String>, verdict: Verdict) {
        let path = path.into();
        match verdict {
            Verdict::Undecided => {
                self.verdicts.remove(&path);
            }
            verdict => {
                self.verdicts.insert(path, verdict);
            }
        }
    }

    /// Advance a photo through the toggle cycle, returning the new verdict
    pub fn toggle(&mut self, path: &str) -> Verdict {
        let next = self.get(path).toggled();
        self.set(path, next);
        next
    }

    /// Apply a policy to every photo of `group`, and only those.
    ///
    /// `Edited` on a group without edited photos changes nothing.
    pub fn bulk_apply(&mut self, group: &Group, policy: BulkPolicy) -> Result<(), ReviewError> {
        if policy == BulkPolicy::Edited && !group.has_edited() {
            return Err(ReviewError::NoEditedPhotos {
                group_id: group.group_id.to_string(),
            });
        }

        for (index, photo) in group.photos.iter().enumerate() {
            let verdict = match policy {
                BulkPolicy::All => Verdict::Keep,
                BulkPolicy::First if index == 0 => Verdict::Keep,
                BulkPolicy::First => Verdict::Delete,
                BulkPolicy::Edited if photo.is_edited => Verdict::Keep,
                BulkPolicy::Edited => Verdict::Delete,
            };
            self.verdicts.insert(photo.path.clone(), verdict);
        }

        tracing::debug!(group = %group.group_id, ?policy, "Bulk verdict applied");
        Ok(())
    }

    /// Every path marked for deletion, sorted
    pub fn delete_set(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .verdicts
            .iter()
            .filter(|(_, verdict)| **verdict == Verdict::Delete)
            .map(|(path, _)| path.clone())
            .collect();
        paths.sort();
        paths
    }

    pub fn counts(&self) -> VerdictCounts {
        self.verdicts
            .values()
            .fold(VerdictCounts::default(), |mut counts, verdict| {
                match verdict {
                    Verdict::Keep => counts.keep += 1,
                    Verdict::Delete => counts.delete += 1,
                    Verdict::Undecided => {}
                }
                counts
            })
    }

    pub fn clear(&mut self) {
        self.verdicts.clear();
    }

    /// Number of photos with an explicit verdict
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}
