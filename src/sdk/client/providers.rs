//! Provider listing

use super::client::{ApiFailure, ListResponse, RagClient, parse_json};
use crate::sdk::{errors::*, types::*};

impl RagClient {
    /// Providers configured on the service
    pub async fn list_providers(&self) -> Result<Vec<ProviderInfo>> {
        let url = self.endpoint(&["providers"])?;
        let response = self
            .send(self.http_client.get(url), "list providers")
            .await?;

        if !response.status().is_success() {
            return Err(ApiFailure::read(response).await.into_api_error());
        }

        let providers: ListResponse<ProviderInfo> = parse_json(response, "list providers").await?;
        Ok(providers.into_vec())
    }

    /// Providers able to back a vector database
    pub async fn vector_io_providers(&self) -> Result<Vec<ProviderInfo>> {
        Ok(self
            .list_providers()
            .await?
            .into_iter()
            .filter(ProviderInfo::is_vector_io)
            .collect())
    }
}
