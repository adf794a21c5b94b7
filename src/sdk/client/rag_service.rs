//! `RagService` implementation for the HTTP client

use super::client::RagClient;
use crate::sdk::service::RagService;
use crate::sdk::{errors::*, types::*};

#[async_trait::async_trait]
impl RagService for RagClient {
    async fn list_vector_dbs(&self) -> Result<Vec<VectorDb>> {
        RagClient::list_vector_dbs(self).await
    }

    async fn get_vector_db(&self, vector_db_id: &str) -> Result<Option<VectorDb>> {
        RagClient::get_vector_db(self, vector_db_id).await
    }

    async fn register_vector_db(&self, registration: &VectorDbRegistration) -> Result<VectorDb> {
        RagClient::register_vector_db(self, registration).await
    }

    async fn unregister_vector_db(&self, vector_db_id: &str) -> Result<()> {
        RagClient::unregister_vector_db(self, vector_db_id).await
    }

    async fn insert_documents(
        &self,
        vector_db_id: &str,
        documents: &[Document],
        chunk_size_in_tokens: u32,
    ) -> Result<()> {
        RagClient::insert_documents(self, vector_db_id, documents, chunk_size_in_tokens).await
    }

    async fn query(
        &self,
        vector_db_id: &str,
        query: &str,
        params: &QueryParams,
    ) -> Result<QueryResult> {
        RagClient::query(self, vector_db_id, query, params).await
    }

    async fn list_providers(&self) -> Result<Vec<ProviderInfo>> {
        RagClient::list_providers(self).await
    }
}
