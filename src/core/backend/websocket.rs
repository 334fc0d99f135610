//! WebSocket connector for the progress push stream.

use super::traits::{PushConnector, PushStream};
use crate::core::config::ClientConfig;
use crate::error::{ReviewClientError, TransportError};
use async_trait::async_trait;
use futures::StreamExt;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

/// Connects to `{base}/api/ws/progress`
#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    url: Url,
}

impl WebSocketConnector {
    pub fn new(config: &ClientConfig) -> Result<Self, ReviewClientError> {
        Ok(Self {
            url: config.progress_ws_url()?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl PushConnector for WebSocketConnector {
    async fn open(&self) -> Result<PushStream, TransportError> {
        let (socket, _response) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(|e| TransportError::PushUnavailable(e.to_string()))?;

        tracing::debug!(url = %self.url, "Progress stream connected");

        // Only text frames carry progress; control frames are handled by tungstenite
        let frames = socket.filter_map(|message| async move {
            match message {
                Ok(Message::Text(text)) => Some(Ok(text.to_string())),
                Ok(_) => None,
                Err(e) => Some(Err(TransportError::PushUnavailable(e.to_string()))),
            }
        });

        Ok(frames.boxed())
    }
}
