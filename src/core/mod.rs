//! # Core Module
//!
//! The front-end agnostic review client.
//!
//! ## Modules
//! - `backend` - REST endpoints and the live progress stream
//! - `config` - Server address and client defaults
//! - `progress` - Progress events and the push/poll channel
//! - `lifecycle` - Scan stage state machine
//! - `results` - Summary, groups and recommendations of a scan
//! - `decisions` - Keep/delete verdicts per photo
//! - `navigator` - Review cursor over groups
//! - `delete` - Confirmation and commit of the delete set
//! - `session` - Everything above for one scan, torn down together
//! - `workflow` - Drives the pages from scan to cleanup

pub mod backend;
pub mod config;
pub mod decisions;
pub mod delete;
pub mod lifecycle;
pub mod model;
pub mod navigator;
pub mod progress;
pub mod results;
pub mod session;
pub mod workflow;

// Re-export commonly used types
pub use backend::{Backend, HttpBackend, PushConnector, StatusSource, WebSocketConnector};
pub use config::ClientConfig;
pub use decisions::{BulkPolicy, DecisionModel, Verdict};
pub use delete::{DeleteOutcome, DeletePlan};
pub use lifecycle::{ScanLifecycle, StatusBadge};
pub use model::{format_file_size, Group, GroupId, Photo, Recommendation, ResultSummary};
pub use progress::{ScanProgress, Stage, Transport};
pub use session::{AutoPlan, ReviewSession};
pub use workflow::{FolderChoice, ScanOutcome, Thumbnail, Workflow};
