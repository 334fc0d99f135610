//! # Photo Review Client
//!
//! Client for a similar-photo scanning server: drives a scan, follows its
//! progress, and lets the user review groups of near-duplicates before
//! anything is deleted.
//!
//! ## Core Philosophy
//! - **Nothing is deleted unconfirmed** - every delete set is shown first
//! - **Recommendations are a starting point** - every verdict can be changed
//! - **Stale progress never leaks** - a new scan replaces the old channel
//!
//! ## Architecture
//! - `core` - Backend client, progress channel and review state
//! - `events` - Event-driven reporting to any front end
//! - `error` - User-facing error types
//! - `cli` - Terminal front end (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{Result, ReviewClientError};

/// Initialize tracing for the library
///
/// This should be called by the application entry point. Filtering
/// follows `RUST_LOG`; a second call is a no-op.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
