//! Configuration integration tests

#[cfg(test)]
mod tests {
    use crate::assert_ok;
    use crate::common::MockRagService;
    use ragtool_client::{ClientConfig, RagClient};
    use serde_json::json;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[test]
    fn test_shipped_example_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/ragtool.yaml.example");
        let config = assert_ok!(ClientConfig::from_file(&path));
        assert_eq!(config.base_url, "http://localhost:8321");
        assert!(config.api_key.is_none());
        assert!(config.settings.resolve_urls);
        assert_eq!(config.settings.default_chunk_size_in_tokens, 512);
        assert_eq!(config.defaults.embedding_model, "all-MiniLM-L6-v2");
        assert_eq!(config.defaults.embedding_dimension, 384);
        assert_eq!(config.defaults.provider_id, "faiss");
    }

    #[tokio::test]
    async fn test_client_from_config_file() {
        let mock = MockRagService::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/providers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"api": "inference", "provider_id": "ollama", "provider_type": "remote::ollama"},
                    {"api": "vector_io", "provider_id": "faiss", "provider_type": "inline::faiss"}
                ]
            })))
            .expect(1)
            .mount(&mock.server)
            .await;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "base_url: \"{}/\"", mock.uri()).unwrap();
        writeln!(file, "settings:\n  timeout: 3").unwrap();

        let config = assert_ok!(ClientConfig::from_file(file.path()));
        assert_eq!(config.base_url, mock.uri());
        assert_eq!(config.settings.timeout, 3);

        let client = assert_ok!(RagClient::new(config));
        let providers = assert_ok!(client.vector_io_providers().await);
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].provider_id, "faiss");
    }
}
