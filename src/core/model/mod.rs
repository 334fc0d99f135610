//! # Model Module
//!
//! Read-only scan results as the backend reports them.
//!
//! Photos are identified by their absolute path. Groups and
//! recommendations are created wholesale when results are fetched and
//! never mutated afterwards.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque group identifier, stable for the lifetime of a review session.
///
/// The backend sends numeric ids today; strings are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for GroupId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => GroupId(n.to_string()),
            Raw::Text(s) => GroupId(s),
        })
    }
}

/// A single photo inside a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Absolute path, the photo's identity
    pub path: String,
    /// File size in bytes
    #[serde(default)]
    pub size: u64,
    /// Edited in the Lightroom catalog
    #[serde(default)]
    pub is_edited: bool,
    /// Starred or flagged in the Lightroom catalog
    #[serde(default)]
    pub is_flagged: bool,
    /// Star rating (0 when unrated)
    #[serde(default)]
    pub rating: i32,
    /// Pick flag: 1 picked, 0 none, -1 rejected
    #[serde(default)]
    pub pick: i32,
}

impl Photo {
    /// The last path component, for display
    pub fn file_name(&self) -> &str {
        self.path.rsplit(['/', '\\']).next().unwrap_or(&self.path)
    }

    pub fn is_rejected(&self) -> bool {
        self.pick == -1
    }
}

/// An ordered set of photos the backend judged similar.
///
/// The first photo is the conventional "primary" candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub group_id: GroupId,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub total_size: u64,
    pub photos: Vec<Photo>,
}

impl Group {
    /// The first photo in backend order
    pub fn primary(&self) -> Option<&Photo> {
        self.photos.first()
    }

    pub fn has_edited(&self) -> bool {
        self.photos.iter().any(|p| p.is_edited)
    }

    /// Member count, falling back to the photo list when the backend
    /// omitted `count`.
    pub fn len(&self) -> usize {
        if self.count > 0 {
            self.count
        } else {
            self.photos.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

/// Backend-suggested keep/delete partition for one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub group_id: GroupId,
    #[serde(default)]
    pub total_in_group: usize,
    pub keep: Vec<String>,
    pub delete: Vec<String>,
    #[serde(default)]
    pub keep_count: usize,
    #[serde(default)]
    pub delete_count: usize,
    /// Bytes reclaimed if the delete set is removed
    #[serde(default)]
    pub save_bytes: u64,
}

/// Totals across every recommendation.
///
/// Every field is defaulted because the progress stream may embed a
/// partial summary in its terminal event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    #[serde(default)]
    pub total_photos: usize,
    #[serde(default)]
    pub total_groups: usize,
    #[serde(default)]
    pub keep_count: usize,
    #[serde(default)]
    pub delete_count: usize,
    #[serde(default)]
    pub save_bytes: u64,
    #[serde(default)]
    pub save_gb: f64,
}

/// Response of the recommendations endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    #[serde(default)]
    pub summary: ResultSummary,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

/// Human-readable byte count using binary units
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_id_accepts_numbers_and_strings() {
        let numeric: GroupId = serde_json::from_str("12").unwrap();
        let text: GroupId = serde_json::from_str("\"g-12\"").unwrap();

        assert_eq!(numeric.as_str(), "12");
        assert_eq!(text.as_str(), "g-12");
    }

    #[test]
    fn photo_defaults_missing_flags() {
        let photo: Photo =
            serde_json::from_str(r#"{"path": "/photos/IMG_0001.NEF", "size": 100, "hash": "ff00"}"#)
                .unwrap();

        assert_eq!(photo.file_name(), "IMG_0001.NEF");
        assert!(!photo.is_edited);
        assert!(!photo.is_flagged);
        assert!(!photo.is_rejected());
    }

    #[test]
    fn group_len_falls_back_to_photos() {
        let group = Group {
            group_id: GroupId::new("1"),
            count: 0,
            total_size: 0,
            photos: vec![
                Photo {
                    path: "/a.jpg".into(),
                    size: 1,
                    is_edited: false,
                    is_flagged: false,
                    rating: 0,
                    pick: 0,
                },
                Photo {
                    path: "/b.jpg".into(),
                    size: 1,
                    is_edited: true,
                    is_flagged: false,
                    rating: 0,
                    pick: 0,
                },
            ],
        };

        assert_eq!(group.len(), 2);
        assert!(group.has_edited());
        assert_eq!(group.primary().map(|p| p.path.as_str()), Some("/a.jpg"));
    }

    #[test]
    fn file_size_uses_binary_units() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512.0 B");
        assert_eq!(format_file_size(2_000_000), "1.9 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }
}
