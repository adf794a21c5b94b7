//! Error handling

use thiserror::Error;

/// Errors surfaced by the RAG client
#[derive(Error, Debug)]
pub enum RagError {
    /// Duplicate or invalid vector database registration
    #[error("Registration error: {0}")]
    Registration(String),

    /// Operation against an unknown vector database
    #[error("Not found: {0}")]
    NotFound(String),

    /// URL-referenced document could not be retrieved
    #[error("Failed to fetch {url}: {reason}")]
    Fetch {
        /// Document URL
        url: String,
        /// Why the fetch failed
        reason: String,
    },

    /// Request rejected before it reached the service
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Service answered with a body that breaks the response contract
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Any other non-success status from the service
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message extracted from the error body
        message: String,
    },

    /// Configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure talking to the service
    #[error("Network error: {0}")]
    Network(String),
}

/// Client result type
pub type Result<T> = std::result::Result<T, RagError>;

impl RagError {
    /// Build a fetch error for `url`
    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        RagError::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Whether repeating the same call could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            RagError::Network(_) => true,
            RagError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Whether the error names an unknown vector database
    pub fn is_not_found(&self) -> bool {
        matches!(self, RagError::NotFound(_))
    }

    /// Configuration
    pub fn is_config_error(&self) -> bool {
        matches!(self, RagError::Config(_))
    }
}
