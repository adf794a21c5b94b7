//! Similarity queries

use super::client::{ApiFailure, RagClient, parse_json};
use crate::sdk::{errors::*, types::*};
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
struct QueryRequest<'a> {
    vector_db_id: &'a str,
    query: &'a str,
    #[serde(skip_serializing_if = "no_params")]
    params: &'a QueryParams,
}

fn no_params(params: &&QueryParams) -> bool {
    params.is_empty()
}

impl RagClient {
    /// Query `vector_db_id` and return the service's ranking as-is
    pub async fn query(
        &self,
        vector_db_id: &str,
        query: &str,
        params: &QueryParams,
    ) -> Result<QueryResult> {
        let url = self.endpoint(&["vector-io", "query"])?;
        let body = QueryRequest {
            vector_db_id,
            query,
            params,
        };

        let response = self
            .send(self.http_client.post(url).json(&body), "query")
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

        let result: QueryResult = parse_json(response, "query").await?;
        result.validate()?;

        debug!("Query on {} returned {} chunks", vector_db_id, result.len());
        Ok(result)
    }
}
