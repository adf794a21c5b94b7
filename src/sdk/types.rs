//! SDK data types

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Registered vector database as reported by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorDb {
    /// Unique identifier
    pub identifier: String,
    /// Embedding model name
    pub embedding_model: String,
    /// Embedding dimensionality
    pub embedding_dimension: u32,
    /// Backing provider
    #[serde(default)]
    pub provider_id: String,
    /// Identifier inside the provider, when it differs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_resource_id: Option<String>,
}

/// Request to register a vector database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorDbRegistration {
    /// Identifier to register
    pub vector_db_id: String,
    /// Embedding model name
    pub embedding_model: String,
    /// Embedding dimensionality
    pub embedding_dimension: u32,
    /// Backing provider
    pub provider_id: String,
    /// Identifier to use inside the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_vector_db_id: Option<String>,
}

impl VectorDbRegistration {
    /// Create a registration request
    pub fn new(
        vector_db_id: impl Into<String>,
        embedding_model: impl Into<String>,
        embedding_dimension: u32,
        provider_id: impl Into<String>,
    ) -> Self {
        Self {
            vector_db_id: vector_db_id.into(),
            embedding_model: embedding_model.into(),
            embedding_dimension,
            provider_id: provider_id.into(),
            provider_vector_db_id: None,
        }
    }

    /// Registration using configured defaults
    pub fn with_defaults(
        vector_db_id: impl Into<String>,
        defaults: &crate::sdk::config::RegistrationDefaults,
    ) -> Self {
        Self::new(
            vector_db_id,
            defaults.embedding_model.clone(),
            defaults.embedding_dimension,
            defaults.provider_id.clone(),
        )
    }

    /// Checks the service would reject anyway
    pub fn validate(&self) -> crate::sdk::errors::Result<()> {
        use crate::sdk::errors::RagError;

        if self.vector_db_id.trim().is_empty() {
            return Err(RagError::Registration(
                "vector_db_id must not be empty".to_string(),
            ));
        }
        if self.embedding_model.trim().is_empty() {
            return Err(RagError::Registration(format!(
                "{}: embedding_model must not be empty",
                self.vector_db_id
            )));
        }
        if self.embedding_dimension == 0 {
            return Err(RagError::Registration(format!(
                "{}: embedding_dimension must be positive",
                self.vector_db_id
            )));
        }
        if self.provider_id.trim().is_empty() {
            return Err(RagError::Registration(format!(
                "{}: provider_id must not be empty",
                self.vector_db_id
            )));
        }
        Ok(())
    }
}

/// Document body: inline text or a URL to fetch it from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentContent {
    /// Text used verbatim
    Text(String),
    /// Remote content
    Url(String),
}

impl DocumentContent {
    /// Treat strings that parse as http(s) URLs as references, anything else as text
    pub fn classify(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match url::Url::parse(raw.trim()) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                DocumentContent::Url(raw.trim().to_string())
            }
            _ => DocumentContent::Text(raw),
        }
    }

    /// Raw string form
    pub fn as_str(&self) -> &str {
        match self {
            DocumentContent::Text(text) => text,
            DocumentContent::Url(url) => url,
        }
    }
}

impl Serialize for DocumentContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DocumentContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Plain(String),
            Uri { uri: String },
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Plain(text) => DocumentContent::classify(text),
            Raw::Uri { uri } => DocumentContent::Url(uri),
        })
    }
}

/// Document handed to the RAG tool for chunking and indexing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier, unique within one insert batch
    pub document_id: String,
    /// Body
    pub content: DocumentContent,
    /// MIME type of the body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Document {
    /// Document with inline text
    pub fn inline(document_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            content: DocumentContent::Text(text.into()),
            mime_type: None,
            metadata: HashMap::new(),
        }
    }

    /// Document whose body lives at `url`
    pub fn url(document_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            content: DocumentContent::Url(url.into()),
            mime_type: None,
            metadata: HashMap::new(),
        }
    }

    /// Set the MIME type
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Add one metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Whether the body still has to be fetched
    pub fn is_url(&self) -> bool {
        matches!(self.content, DocumentContent::Url(_))
    }
}

/// Fragment of a document returned by a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text of the fragment
    #[serde(deserialize_with = "content_text")]
    pub content: String,
    /// Service-supplied metadata (source document, token count, ...)
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Chunk {
    /// Chunk with text only
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    /// Source document, when the service reports it
    pub fn document_id(&self) -> Option<&str> {
        self.metadata.get("document_id").and_then(|v| v.as_str())
    }

    /// Token count, when the service reports it
    pub fn token_count(&self) -> Option<u64> {
        self.metadata.get("token_count").and_then(|v| v.as_u64())
    }
}

// Chunk content may come back as a string, a text item, or a list of items.
fn content_text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(flatten_content(&value))
}

fn flatten_content(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(flatten_content)
            .collect::<Vec<_>>()
            .join(""),
        serde_json::Value::Object(map) => map
            .get("text")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

/// Optional ranking controls for a query
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    /// Cap on returned chunks, applied after ranking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chunks: Option<usize>,
    /// Minimum score a chunk needs to be returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_threshold: Option<f32>,
}

impl QueryParams {
    /// No filtering
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `max_chunks` results
    pub fn max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = Some(max_chunks);
        self
    }

    /// Drop results scoring below `threshold`
    pub fn score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = Some(threshold);
        self
    }

    /// Whether no option is set
    pub fn is_empty(&self) -> bool {
        self.max_chunks.is_none() && self.score_threshold.is_none()
    }

    /// Reject values no query can honor
    pub fn validate(&self) -> crate::sdk::errors::Result<()> {
        use crate::sdk::errors::RagError;

        if self.max_chunks == Some(0) {
            return Err(RagError::InvalidRequest(
                "max_chunks must be positive".to_string(),
            ));
        }
        if let Some(threshold) = self.score_threshold {
            if !threshold.is_finite() {
                return Err(RagError::InvalidRequest(format!(
                    "score_threshold must be finite, got {}",
                    threshold
                )));
            }
        }
        Ok(())
    }
}

/// Ranked chunks and their scores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Retrieved chunks
    #[serde(default)]
    pub chunks: Vec<Chunk>,
    /// Relevance score of each chunk, same order
    #[serde(default)]
    pub scores: Vec<f32>,
}

impl QueryResult {
    /// Number of results
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether nothing matched
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Chunk/score pairs in result order
    pub fn iter(&self) -> impl Iterator<Item = (&Chunk, f32)> {
        self.chunks.iter().zip(self.scores.iter().copied())
    }

    /// Best-scoring pair
    pub fn top(&self) -> Option<(&Chunk, f32)> {
        self.iter().max_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Whether any chunk contains `needle`
    pub fn any_contains(&self, needle: &str) -> bool {
        self.chunks.iter().any(|c| c.content.contains(needle))
    }

    /// Case-insensitive [`Self::any_contains`]
    pub fn any_contains_ignore_case(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.chunks
            .iter()
            .any(|c| c.content.to_lowercase().contains(&needle))
    }

    /// Check the shape invariants of a service response
    pub fn validate(&self) -> crate::sdk::errors::Result<()> {
        use crate::sdk::errors::RagError;

        if self.chunks.len() != self.scores.len() {
            return Err(RagError::InvalidResponse(format!(
                "{} chunks but {} scores",
                self.chunks.len(),
                self.scores.len()
            )));
        }
        if let Some(bad) = self.scores.iter().find(|s| !s.is_finite()) {
            return Err(RagError::InvalidResponse(format!(
                "non-finite score {}",
                bad
            )));
        }
        Ok(())
    }

    /// Rank by descending score, drop scores under the threshold, keep the top K
    ///
    /// Ties keep their original relative order.
    pub fn enforce(self, params: &QueryParams) -> Self {
        let mut pairs: Vec<(Chunk, f32)> = self.chunks.into_iter().zip(self.scores).collect();
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));

        if let Some(threshold) = params.score_threshold {
            pairs.retain(|(_, score)| *score >= threshold);
        }
        if let Some(max_chunks) = params.max_chunks {
            pairs.truncate(max_chunks);
        }

        let (chunks, scores) = pairs.into_iter().unzip();
        Self { chunks, scores }
    }
}

/// Provider entry from the service's provider listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// API the provider implements, e.g. `vector_io`
    pub api: String,
    /// Provider identifier
    #[serde(alias = "id")]
    pub provider_id: String,
    /// Provider implementation type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<String>,
}

/// API name of vector storage providers
pub const VECTOR_IO_API: &str = "vector_io";

impl ProviderInfo {
    /// Whether this provider can back a vector database
    pub fn is_vector_io(&self) -> bool {
        self.api == VECTOR_IO_API
    }
}
