//! Eager retrieval of URL-referenced documents

use crate::sdk::errors::{RagError, Result};
use crate::sdk::types::{Document, DocumentContent};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;

/// Media types that never decode to indexable text
const BINARY_PREFIXES: &[&str] = &["image/", "audio/", "video/", "font/"];
const BINARY_TYPES: &[&str] = &["application/pdf", "application/zip", "application/gzip"];

/// Body and media type of a fetched document
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedDocument {
    /// Decoded text
    pub text: String,
    /// Media type reported by the host, parameters stripped
    pub mime_type: Option<String>,
}

/// Downloads document bodies so they can be inserted inline
#[derive(Debug, Clone)]
pub struct DocumentFetcher {
    http_client: reqwest::Client,
    max_bytes: usize,
}

impl DocumentFetcher {
    /// Create a fetcher with its own credential-free HTTP client
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RagError::Config(format!("Failed to create fetch client: {}", e)))?;
        Ok(Self {
            http_client,
            max_bytes,
        })
    }

    /// Download `url` as text
    pub async fn fetch(&self, url: &str) -> Result<FetchedDocument> {
        let parsed =
            url::Url::parse(url).map_err(|e| RagError::fetch(url, format!("invalid URL: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RagError::fetch(
                url,
                format!("unsupported scheme {}", parsed.scheme()),
            ));
        }

        let mut response = self
            .http_client
            .get(parsed)
            .send()
            .await
            .map_err(|e| RagError::fetch(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RagError::fetch(url, format!("HTTP {}", status)));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_bytes as u64 {
                return Err(RagError::fetch(
                    url,
                    format!("body of {} bytes exceeds limit of {}", length, self.max_bytes),
                ));
            }
        }

        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(media_type);

        if let Some(mime) = &mime_type {
            if is_binary(mime) {
                return Err(RagError::fetch(url, format!("unsupported media type {}", mime)));
            }
        }

        // Content-Length is absent on chunked bodies; cap while reading
        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| RagError::fetch(url, e.to_string()))?
        {
            if body.len().saturating_add(chunk.len()) > self.max_bytes {
                return Err(RagError::fetch(
                    url,
                    format!("body exceeds limit of {} bytes", self.max_bytes),
                ));
            }
            body.extend_from_slice(&chunk);
        }

        let text = String::from_utf8(body)
            .map_err(|_| RagError::fetch(url, "body is not valid UTF-8"))?;

        debug!("Fetched {} bytes from {}", text.len(), url);
        Ok(FetchedDocument { text, mime_type })
    }

    /// Inline the body of a URL document; inline documents pass through
    pub async fn resolve(&self, document: &Document) -> Result<Document> {
        let url = match &document.content {
            DocumentContent::Text(_) => return Ok(document.clone()),
            DocumentContent::Url(url) => url,
        };

        let fetched = self.fetch(url).await?;
        Ok(Document {
            document_id: document.document_id.clone(),
            content: DocumentContent::Text(fetched.text),
            mime_type: document.mime_type.clone().or(fetched.mime_type),
            metadata: document.metadata.clone(),
        })
    }
}

fn media_type(header: &str) -> String {
    header
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

fn is_binary(mime: &str) -> bool {
    BINARY_PREFIXES.iter().any(|p| mime.starts_with(p)) || BINARY_TYPES.contains(&mime)
}
