//! Vector database registry methods

use super::client::{ApiFailure, ListResponse, RagClient, parse_json};
use crate::sdk::{errors::*, types::*};
use reqwest::StatusCode;
use tracing::{debug, info};

impl RagClient {
    /// List registered vector databases
    pub async fn list_vector_dbs(&self) -> Result<Vec<VectorDb>> {
        let url = self.endpoint(&["vector-dbs"])?;
        let response = self
            .send(self.http_client.get(url), "list vector dbs")
            .await?;

        if !response.status().is_success() {
            return Err(ApiFailure::read(response).await.into_api_error());
        }

        let dbs: ListResponse<VectorDb> = parse_json(response, "list vector dbs").await?;
        let dbs = dbs.into_vec();
        debug!("Service reports {} vector dbs", dbs.len());
        Ok(dbs)
    }

    /// Identifiers of registered vector databases
    pub async fn list_vector_db_ids(&self) -> Result<Vec<String>> {
        Ok(self
            .list_vector_dbs()
            .await?
            .into_iter()
            .map(|db| db.identifier)
            .collect())
    }

    /// Look up one vector database
    pub async fn get_vector_db(&self, vector_db_id: &str) -> Result<Option<VectorDb>> {
        let url = self.endpoint(&["vector-dbs", vector_db_id])?;
        let response = self.send(self.http_client.get(url), "get vector db").await?;

        if !response.status().is_success() {
            let failure = ApiFailure::read(response).await;
            if failure.is_not_found() {
                return Ok(None);
            }
            return Err(failure.into_api_error());
        }

        // Some service versions answer 200 with a null body for unknown ids
        let db: Option<VectorDb> = parse_json(response, "get vector db").await?;
        Ok(db)
    }

    /// Register a vector database
    pub async fn register_vector_db(&self, registration: &VectorDbRegistration) -> Result<VectorDb> {
        registration.validate()?;

        let url = self.endpoint(&["vector-dbs"])?;
        let response = self
            .send(
                self.http_client.post(url).json(registration),
                "register vector db",
            )
            .await?;

        let status = response.status();
        if !status.is_success() {
            let failure = ApiFailure::read(response).await;
            return Err(match failure.status {
                StatusCode::BAD_REQUEST
                | StatusCode::NOT_FOUND
                | StatusCode::CONFLICT
                | StatusCode::UNPROCESSABLE_ENTITY => RagError::Registration(format!(
                    "{}: {}",
                    registration.vector_db_id, failure.message
                )),
                _ => failure.into_api_error(),
            });
        }

        // Older services answer with an empty body
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RagError::Network(format!("register vector db body read failed: {}", e)))?;
        let db = if bytes.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            serde_json::from_slice::<Option<VectorDb>>(&bytes).map_err(|e| {
                RagError::InvalidResponse(format!("register vector db returned malformed JSON: {}", e))
            })?
        };

        info!(
            "Registered vector db {} ({}, dim {}, provider {})",
            registration.vector_db_id,
            registration.embedding_model,
            registration.embedding_dimension,
            registration.provider_id
        );

        Ok(db.unwrap_or_else(|| VectorDb {
            identifier: registration.vector_db_id.clone(),
            embedding_model: registration.embedding_model.clone(),
            embedding_dimension: registration.embedding_dimension,
            provider_id: registration.provider_id.clone(),
            provider_resource_id: registration.provider_vector_db_id.clone(),
        }))
    }

    /// Unregister a vector database
    pub async fn unregister_vector_db(&self, vector_db_id: &str) -> Result<()> {
        let url = self.endpoint(&["vector-dbs", vector_db_id])?;
        let response = self
            .send(self.http_client.delete(url), "unregister vector db")
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

        info!("Unregistered vector db {}", vector_db_id);
        Ok(())
    }
}
