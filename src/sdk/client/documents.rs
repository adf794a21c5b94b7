//! Document insertion

use super::client::{ApiFailure, RagClient};
use crate::sdk::{errors::*, types::*};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Serialize)]
struct InsertRequest<'a> {
    documents: &'a [Document],
    vector_db_id: &'a str,
    chunk_size_in_tokens: u32,
}

impl RagClient {
    /// Chunk and index documents into `vector_db_id`
    ///
    /// URL documents are downloaded first when `resolve_urls` is on, so an
    /// unreachable document fails the whole batch with [`RagError::Fetch`]
    /// before anything is sent.
    pub async fn insert_documents(
        &self,
        vector_db_id: &str,
        documents: &[Document],
        chunk_size_in_tokens: u32,
    ) -> Result<()> {
        let resolved;
        let documents = if self.config.settings.resolve_urls && documents.iter().any(Document::is_url) {
            let mut inlined = Vec::with_capacity(documents.len());
            for document in documents {
                inlined.push(self.fetcher.resolve(document).await?);
            }
            resolved = inlined;
            resolved.as_slice()
        } else {
            documents
        };

        let url = self.endpoint(&["tool-runtime", "rag-tool", "insert"])?;
        let body = InsertRequest {
            documents,
            vector_db_id,
            chunk_size_in_tokens,
        };
        debug!(
            "Inserting {} documents into {} (chunk size {})",
            documents.len(),
            vector_db_id,
            chunk_size_in_tokens
        );

        let response = self
            .send(self.http_client.post(url).json(&body), "insert documents")
            .await?;

        if !response.status().is_success() {
            let failure = ApiFailure::read(response).await;
            if failure.is_not_found() {
                return Err(RagError::NotFound(format!(
                    "vector db {}: {}",
                    vector_db_id, failure.message
                )));
            }
            return Err(failure.into_api_error());
        }

        info!("Inserted {} documents into {}", documents.len(), vector_db_id);
        Ok(())
    }
}
