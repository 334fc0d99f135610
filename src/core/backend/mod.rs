//! # Backend Module
//!
//! The scanning server as this client sees it.
//!
//! ## Interfaces
//! - `Backend` - request/response endpoints (scan, groups, delete, ...)
//! - `StatusSource` - status snapshots for the polling fallback
//! - `PushConnector` - opens the live progress stream
//!
//! ## Implementations
//! - `HttpBackend` - REST API over reqwest
//! - `WebSocketConnector` - progress stream over tokio-tungstenite

mod http;
mod traits;
mod websocket;
pub mod wire;

pub use http::HttpBackend;
pub use traits::{Backend, PushConnector, PushStream, StatusSource};
pub use websocket::WebSocketConnector;
pub use wire::{
    DeleteFailure, DeleteResponse, PickFolderResponse, PushFrame, ScanRequest, StatusResponse,
};
