//! Core RAG client implementation

use super::fetch::DocumentFetcher;
use crate::sdk::{config::ClientConfig, errors::*};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

/// User agent sent to the service
const USER_AGENT: &str = concat!("ragtool-client/", env!("CARGO_PKG_VERSION"));

/// HTTP client for a remote RAG service
#[derive(Debug, Clone)]
pub struct RagClient {
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) http_client: reqwest::Client,
    pub(crate) fetcher: DocumentFetcher,
}

impl RagClient {
    /// Create new RAG client
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| RagError::Config(format!("Invalid API key: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| RagError::Config(format!("Failed to create HTTP client: {}", e)))?;

        // Document hosts never see the service credentials
        let fetcher = DocumentFetcher::new(config.timeout(), config.settings.max_document_bytes)?;

        info!("RagClient created for {}", config.base_url);

        Ok(Self {
            config: Arc::new(config),
            http_client,
            fetcher,
        })
    }

    /// Create a client from `RAGTOOL_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Get configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `{base_url}/v1/{segments...}` with each segment percent-encoded
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<url::Url> {
        let mut url = url::Url::parse(&self.config.base_url)
            .map_err(|e| RagError::Config(format!("Invalid base_url: {}", e)))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| RagError::Config("base_url cannot carry a path".to_string()))?;
            path.pop_if_empty().push("v1").extend(segments);
        }
        Ok(url)
    }

    /// Send a request, turning transport failures into [`RagError::Network`]
    pub(crate) async fn send(&self, request: RequestBuilder, operation: &str) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RagError::Network(format!("{} timed out: {}", operation, e))
            } else {
                RagError::Network(format!("{} failed: {}", operation, e))
            }
        })?;
        debug!("{} -> {}", operation, response.status());
        Ok(response)
    }
}

/// Status and message of a failed response
#[derive(Debug)]
pub(crate) struct ApiFailure {
    pub status: StatusCode,
    pub message: String,
}

impl ApiFailure {
    /// Consume a non-success response
    pub(crate) async fn read(response: Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self {
            status,
            message: error_message(status, &body),
        }
    }

    /// Whether the service is saying the resource does not exist
    pub(crate) fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
            || (self.status == StatusCode::BAD_REQUEST
                && self.message.to_lowercase().contains("not found"))
    }

    /// Fallback mapping
    pub(crate) fn into_api_error(self) -> RagError {
        RagError::Api {
            status: self.status.as_u16(),
            message: self.message,
        }
    }
}

/// Pull a human-readable message out of an error body
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            let candidates = [
                &value["detail"],
                &value["error"]["message"],
                &value["error"],
                &value["message"],
            ];
            candidates.into_iter().find_map(|v| match v {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Null => None,
                serde_json::Value::Object(map) if map.contains_key("message") => None,
                other => Some(other.to_string()),
            })
        });

    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    }
}

/// List endpoints answer either `{"data": [...]}` or a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListResponse<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListResponse<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Wrapped { data } => data,
            ListResponse::Bare(items) => items,
        }
    }
}

/// Parse a JSON body, reporting malformed payloads as contract violations
pub(crate) async fn parse_json<T: serde::de::DeserializeOwned>(
    response: Response,
    operation: &str,
) -> Result<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| RagError::Network(format!("{} body read failed: {}", operation, e)))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        RagError::InvalidResponse(format!("{} returned malformed JSON: {}", operation, e))
    })
}
