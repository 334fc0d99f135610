//! HTTP implementation of the backend using reqwest.

use super::traits::{Backend, StatusSource};
use super::wire::{
    DeleteRequest, DeleteResponse, ErrorBody, GroupsResponse, PickFolderResponse, ScanRequest,
    StatusResponse,
};
use crate::core::config::ClientConfig;
use crate::core::model::{Group, RecommendationSet};
use crate::error::{ReviewClientError, TransportError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

/// Backend reached over the REST API
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    api_url: Url,
}

impl HttpBackend {
    /// Create a backend client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self, ReviewClientError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ReviewClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: config.api_url()?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.api_url
            .join(path)
            .map_err(|e| TransportError::Unreachable {
                endpoint: path.to_string(),
                reason: e.to_string(),
            })
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> Result<Response, TransportError> {
        let response = request.send().await.map_err(|e| TransportError::Unreachable {
            endpoint: path.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Prefer the server's own explanation over the status line
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        Err(TransportError::Status {
            endpoint: path.to_string(),
            status: status.as_u16(),
            detail,
        })
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, TransportError> {
        response.json::<T>().await.map_err(|e| TransportError::Decode {
            endpoint: path.to_string(),
            reason: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let url = self.endpoint(path)?;
        let response = self.send(path, self.client.get(url)).await?;
        Self::decode(path, response).await
    }
}

#[async_trait]
impl StatusSource for HttpBackend {
    async fn scan_status(&self) -> Result<StatusResponse, TransportError> {
        self.get_json("scan/status").await
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn start_scan(&self, request: &ScanRequest) -> Result<(), TransportError> {
        let url = self.endpoint("scan")?;
        self.send("scan", self.client.post(url).json(request)).await?;
        tracing::info!(directory = %request.directory, threshold = request.threshold, "Scan requested");
        Ok(())
    }

    async fn groups(&self) -> Result<Vec<Group>, TransportError> {
        let response: GroupsResponse = self.get_json("groups").await?;
        Ok(response.groups)
    }

    async fn recommendations(&self) -> Result<Option<RecommendationSet>, TransportError> {
        match self.get_json::<RecommendationSet>("recommendations").await {
            Ok(set) => Ok(Some(set)),
            Err(TransportError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                tracing::debug!("Scan produced no recommendations");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn delete(&self, paths: &[String]) -> Result<DeleteResponse, TransportError> {
        let url = self.endpoint("delete")?;
        let response = self
            .send("delete", self.client.post(url).json(&DeleteRequest { paths }))
            .await?;
        Self::decode("delete", response).await
    }

    async fn pick_folder(&self) -> Result<PickFolderResponse, TransportError> {
        self.get_json("pick-folder").await
    }

    async fn thumbnail(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        let url = self.endpoint("thumbnail")?;
        let response = self
            .send("thumbnail", self.client.get(url).query(&[("path", path)]))
            .await?;
        let bytes = response.bytes().await.map_err(|e| TransportError::Decode {
            endpoint: "thumbnail".to_string(),
            reason: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }

    async fn reset(&self) -> Result<(), TransportError> {
        let url = self.endpoint("reset")?;
        self.send("reset", self.client.post(url)).await?;
        Ok(())
    }
}
