//! Insert-then-query workflow with client-side contract checks

use crate::sdk::errors::{RagError, Result};
use crate::sdk::service::RagService;
use crate::sdk::types::*;
use std::collections::HashSet;
use tracing::{debug, info};

/// Chunk size used when none is configured
pub const DEFAULT_CHUNK_SIZE_IN_TOKENS: u32 = 512;

/// Drives a [`RagService`] and holds it to the response contract
///
/// Inputs are checked before any request is made. Query results are checked
/// for shape and then re-ranked and filtered locally, so `max_chunks` and
/// `score_threshold` hold even against a service that ignores them.
#[derive(Debug, Clone)]
pub struct RagWorkflow<S> {
    service: S,
    chunk_size_in_tokens: u32,
}

impl<S: RagService> RagWorkflow<S> {
    /// Workflow with the default chunk size
    pub fn new(service: S) -> Self {
        Self {
            service,
            chunk_size_in_tokens: DEFAULT_CHUNK_SIZE_IN_TOKENS,
        }
    }

    /// Change the chunk size used by [`Self::insert_documents`]
    pub fn with_chunk_size(mut self, chunk_size_in_tokens: u32) -> Self {
        self.chunk_size_in_tokens = chunk_size_in_tokens;
        self
    }

    /// Underlying service
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Configured chunk size
    pub fn chunk_size_in_tokens(&self) -> u32 {
        self.chunk_size_in_tokens
    }

    /// Providers that can back a vector database; fails if there are none
    pub async fn require_vector_io_providers(&self) -> Result<Vec<ProviderInfo>> {
        let providers: Vec<ProviderInfo> = self
            .service
            .list_providers()
            .await?
            .into_iter()
            .filter(ProviderInfo::is_vector_io)
            .collect();

        if providers.is_empty() {
            return Err(RagError::Registration(format!(
                "service has no {} provider",
                VECTOR_IO_API
            )));
        }
        Ok(providers)
    }

    /// Register a vector database
    pub async fn register(&self, registration: &VectorDbRegistration) -> Result<VectorDb> {
        registration.validate()?;
        self.service.register_vector_db(registration).await
    }

    /// Unregister a vector database
    pub async fn unregister(&self, vector_db_id: &str) -> Result<()> {
        self.service.unregister_vector_db(vector_db_id).await
    }

    /// Identifiers of registered vector databases
    pub async fn list(&self) -> Result<Vec<String>> {
        Ok(self
            .service
            .list_vector_dbs()
            .await?
            .into_iter()
            .map(|db| db.identifier)
            .collect())
    }

    /// Insert documents with the configured chunk size
    pub async fn insert_documents(&self, vector_db_id: &str, documents: &[Document]) -> Result<()> {
        self.insert_documents_with_chunk_size(vector_db_id, documents, self.chunk_size_in_tokens)
            .await
    }

    /// Insert documents with an explicit chunk size
    pub async fn insert_documents_with_chunk_size(
        &self,
        vector_db_id: &str,
        documents: &[Document],
        chunk_size_in_tokens: u32,
    ) -> Result<()> {
        validate_batch(documents, chunk_size_in_tokens)?;
        self.service
            .insert_documents(vector_db_id, documents, chunk_size_in_tokens)
            .await?;
        info!(
            "Workflow inserted {} documents into {}",
            documents.len(),
            vector_db_id
        );
        Ok(())
    }

    /// Query without filtering
    pub async fn query(&self, vector_db_id: &str, query: &str) -> Result<QueryResult> {
        self.query_with_params(vector_db_id, query, &QueryParams::default())
            .await
    }

    /// Query with `max_chunks` / `score_threshold`
    ///
    /// The result is ordered by descending score, every score is at least the
    /// threshold, and its length is at most `max_chunks`.
    pub async fn query_with_params(
        &self,
        vector_db_id: &str,
        query: &str,
        params: &QueryParams,
    ) -> Result<QueryResult> {
        if query.trim().is_empty() {
            return Err(RagError::InvalidRequest("query must not be empty".to_string()));
        }
        params.validate()?;

        let result = self.service.query(vector_db_id, query, params).await?;
        result.validate()?;

        let received = result.len();
        let result = result.enforce(params);
        if result.len() != received {
            debug!(
                "Client-side filtering kept {} of {} chunks",
                result.len(),
                received
            );
        }
        Ok(result)
    }
}

/// Reject batches the service should never see
pub fn validate_batch(documents: &[Document], chunk_size_in_tokens: u32) -> Result<()> {
    if documents.is_empty() {
        return Err(RagError::InvalidRequest(
            "at least one document is required".to_string(),
        ));
    }
    if chunk_size_in_tokens == 0 {
        return Err(RagError::InvalidRequest(
            "chunk_size_in_tokens must be positive".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(documents.len());
    for document in documents {
        if document.document_id.trim().is_empty() {
            return Err(RagError::InvalidRequest(
                "document_id must not be empty".to_string(),
            ));
        }
        if !seen.insert(document.document_id.as_str()) {
            return Err(RagError::InvalidRequest(format!(
                "duplicate document_id {} in batch",
                document.document_id
            )));
        }
    }
    Ok(())
}
