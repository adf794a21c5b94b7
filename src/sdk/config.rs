//! Client configuration

use crate::sdk::errors::{RagError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default service endpoint
pub const DEFAULT_BASE_URL: &str = "http://localhost:8321";

/// Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service base URL, without the `/v1` suffix
    pub base_url: String,
    /// Bearer token sent with every request
    pub api_key: Option<String>,
    /// Settings
    pub settings: ClientSettings,
    /// Values used when registering a vector database without explicit parameters
    pub defaults: RegistrationDefaults,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            settings: ClientSettings::default(),
            defaults: RegistrationDefaults::default(),
        }
    }
}

/// Settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Request timeout in seconds
    pub timeout: u64,
    /// Fetch URL-referenced documents locally before inserting them
    pub resolve_urls: bool,
    /// Largest document body accepted from a URL fetch
    pub max_document_bytes: usize,
    /// Chunk size used when the caller does not pick one
    pub default_chunk_size_in_tokens: u32,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: 30,
            resolve_urls: true,
            max_document_bytes: 10 * 1024 * 1024,
            default_chunk_size_in_tokens: 512,
        }
    }
}

/// Registration defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationDefaults {
    /// Embedding model name
    pub embedding_model: String,
    /// Embedding dimensionality
    pub embedding_dimension: u32,
    /// Vector IO provider
    pub provider_id: String,
}

impl Default for RegistrationDefaults {
    fn default() -> Self {
        Self {
            embedding_model: "all-MiniLM-L6-v2".to_string(),
            embedding_dimension: 384,
            provider_id: "faiss".to_string(),
        }
    }
}

/// Configuration
pub struct ConfigBuilder {
    config: ClientConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Service base URL
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Bearer token
    pub fn api_key(mut self, api_key: &str) -> Self {
        self.config.api_key = Some(api_key.to_string());
        self
    }

    /// Settings
    pub fn timeout(mut self, timeout: u64) -> Self {
        self.config.settings.timeout = timeout;
        self
    }

    /// Settings
    pub fn resolve_urls(mut self, resolve: bool) -> Self {
        self.config.settings.resolve_urls = resolve;
        self
    }

    /// Settings
    pub fn max_document_bytes(mut self, bytes: usize) -> Self {
        self.config.settings.max_document_bytes = bytes;
        self
    }

    /// Settings
    pub fn default_chunk_size(mut self, tokens: u32) -> Self {
        self.config.settings.default_chunk_size_in_tokens = tokens;
        self
    }

    /// Registration defaults
    pub fn defaults(mut self, defaults: RegistrationDefaults) -> Self {
        self.config.defaults = defaults;
        self
    }

    /// Configuration
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfig {
    /// Configuration from `RAGTOOL_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup("RAGTOOL_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(api_key) = lookup("RAGTOOL_API_KEY") {
            if !api_key.is_empty() {
                config.api_key = Some(api_key);
            }
        }
        if let Some(timeout) = lookup("RAGTOOL_TIMEOUT") {
            config.settings.timeout = timeout
                .parse()
                .map_err(|e| RagError::Config(format!("Invalid RAGTOOL_TIMEOUT: {}", e)))?;
        }
        if let Some(resolve) = lookup("RAGTOOL_RESOLVE_URLS") {
            config.settings.resolve_urls = resolve
                .parse()
                .map_err(|e| RagError::Config(format!("Invalid RAGTOOL_RESOLVE_URLS: {}", e)))?;
        }

        config.validate()?;
        debug!("Loaded client configuration for {}", config.base_url);
        Ok(config)
    }

    /// Configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RagError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut config: Self = serde_yaml::from_str(&content).map_err(|e| {
            RagError::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the client cannot run with
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| RagError::Config(format!("Invalid base_url {}: {}", self.base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RagError::Config(format!(
                "base_url must be http or https, got {}",
                parsed.scheme()
            )));
        }
        if self.settings.timeout == 0 {
            return Err(RagError::Config("timeout must be positive".to_string()));
        }
        if self.settings.max_document_bytes == 0 {
            return Err(RagError::Config(
                "max_document_bytes must be positive".to_string(),
            ));
        }
        if self.settings.default_chunk_size_in_tokens == 0 {
            return Err(RagError::Config(
                "default_chunk_size_in_tokens must be positive".to_string(),
            ));
        }
        if self.defaults.embedding_dimension == 0 {
            return Err(RagError::Config(
                "embedding_dimension must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.settings.timeout)
    }
}
