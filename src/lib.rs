//! # ragtool-client
//!
//! Async client for remote retrieval-augmented-generation services.
//!
//! ## Features
//!
//! - **Vector database registry**: list, register and unregister named vector databases
//! - **Document insertion**: inline text or URL-referenced documents, chunked by the service
//! - **Similarity queries**: `max_chunks` / `score_threshold` controls, enforced client-side
//! - **Scoped registries**: acquire a clean registry and release it on every exit path
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ragtool_client::{ConfigBuilder, Document, QueryParams, RagClient, RagWorkflow};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RagClient::new(ConfigBuilder::new().base_url("http://localhost:8321").build())?;
//!     let workflow = RagWorkflow::new(client);
//!
//!     workflow
//!         .insert_documents(
//!             "my_db",
//!             &[Document::inline("doc-1", "Python is a high-level programming language.")],
//!         )
//!         .await?;
//!
//!     let result = workflow
//!         .query_with_params("my_db", "programming language", &QueryParams::new().max_chunks(2))
//!         .await?;
//!     for (chunk, score) in result.iter() {
//!         println!("{:.3} {}", score, chunk.content);
//!     }
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod sdk;
pub mod utils;

// Re-export main types
pub use sdk::{
    Chunk, ClientConfig, ConfigBuilder, Document, DocumentContent, ProviderInfo, QueryParams,
    QueryResult, RagClient, RagError, RagService, RagWorkflow, RegistryScope, Result, VectorDb,
    VectorDbRegistration, clear_registry, with_clean_registry,
};
