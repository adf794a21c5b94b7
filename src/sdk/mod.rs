//! RAG service SDK
//!
//! Typed access to a remote retrieval-augmented-generation service: vector
//! database registration, document insertion and similarity queries, plus the
//! workflow and registry helpers built on top of them.

pub mod client;
pub mod config;
pub mod errors;
pub mod registry;
pub mod service;
pub mod types;
pub mod workflow;


// Re-exports for convenience
pub use client::{DocumentFetcher, FetchedDocument, RagClient};
pub use config::{ClientConfig, ClientSettings, ConfigBuilder, RegistrationDefaults};
pub use errors::{RagError, Result};
pub use registry::{RegistryScope, clear_registry, random_vector_db_id, with_clean_registry};
pub use service::RagService;
pub use types::*;
pub use workflow::{DEFAULT_CHUNK_SIZE_IN_TOKENS, RagWorkflow, validate_batch};

/// SDK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
