//! Request/response seam to the remote RAG service

use crate::sdk::errors::Result;
use crate::sdk::types::{
    Document, ProviderInfo, QueryParams, QueryResult, VectorDb, VectorDbRegistration,
};

/// Operations the remote vector database service exposes
///
/// Every method is a single round trip. Implementations report unknown
/// databases as [`RagError::NotFound`](crate::sdk::RagError::NotFound) and
/// rejected registrations as
/// [`RagError::Registration`](crate::sdk::RagError::Registration).
#[async_trait::async_trait]
pub trait RagService: Send + Sync {
    /// All registered vector databases
    async fn list_vector_dbs(&self) -> Result<Vec<VectorDb>>;

    /// One vector database, `None` if it is not registered
    async fn get_vector_db(&self, vector_db_id: &str) -> Result<Option<VectorDb>>;

    /// Register a new vector database
    async fn register_vector_db(&self, registration: &VectorDbRegistration) -> Result<VectorDb>;

    /// Remove a vector database
    async fn unregister_vector_db(&self, vector_db_id: &str) -> Result<()>;

    /// Chunk and index documents into a vector database
    async fn insert_documents(
        &self,
        vector_db_id: &str,
        documents: &[Document],
        chunk_size_in_tokens: u32,
    ) -> Result<()>;

    /// Similarity query
    async fn query(
        &self,
        vector_db_id: &str,
        query: &str,
        params: &QueryParams,
    ) -> Result<QueryResult>;

    /// Providers configured on the service
    async fn list_providers(&self) -> Result<Vec<ProviderInfo>>;
}
