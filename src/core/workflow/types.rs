//! Small value types returned by the workflow.

use serde::{Deserialize, Serialize};

/// How a scan settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanOutcome {
    /// The job reached `done` and results were loaded
    Completed,
    /// Progress stopped arriving before a terminal stage
    Interrupted,
}

/// Result of asking for a native folder dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderChoice {
    Picked(String),
    /// No dialog or nothing chosen; the user types a path instead
    ManualEntry,
}

/// Drawn when a thumbnail cannot be loaded
pub const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="0 0 200 200"><rect width="200" height="200" fill="#2a2a2a"/><text x="100" y="105" fill="#888" font-family="sans-serif" font-size="14" text-anchor="middle">Failed to load</text></svg>"##;

/// Image bytes for a photo card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Thumbnail {
    Image(Vec<u8>),
    Placeholder,
}

impl Thumbnail {
    pub fn bytes(&self) -> &[u8] {
        match self {
            Thumbnail::Image(bytes) => bytes,
            Thumbnail::Placeholder => PLACEHOLDER_SVG.as_bytes(),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Thumbnail::Image(_) => "image/jpeg",
            Thumbnail::Placeholder => "image/svg+xml",
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Thumbnail::Placeholder)
    }
}
