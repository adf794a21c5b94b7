//! Error handling integration tests
//!
//! Status codes and bodies from the service must land on the right
//! `RagError` variant.

#[cfg(test)]
mod tests {
    use crate::assert_err;
    use crate::common::{MockRagService, sample_documents};
    use ragtool_client::{ConfigBuilder, QueryParams, RagClient, RagError};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    // ==================== Status mapping ====================

    #[tokio::test]
    async fn test_server_error_is_api_error() {
        let mock = MockRagService::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/vector-dbs"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "error": {"message": "provider unavailable"}
            })))
            .mount(&mock.server)
            .await;

        let err = assert_err!(mock.client().list_vector_dbs().await);
        match &err {
            RagError::Api { status, message } => {
                assert_eq!(*status, 503);
                assert_eq!(message, "provider unavailable");
            }
            other => panic!("expected Api, got {:?}", other),
        }
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_unauthorized_is_api_error() {
        let mock = MockRagService::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/vector-io/query"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
            .mount(&mock.server)
            .await;

        let err = assert_err!(mock.client().query("db", "q", &QueryParams::new()).await);
        assert!(matches!(err, RagError::Api { status: 401, .. }));
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("invalid token"));
    }

    #[tokio::test]
    async fn test_bad_request_without_not_found_is_api_error() {
        let mock = MockRagService::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/tool-runtime/rag-tool/insert"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "detail": "chunk_size_in_tokens too large"
            })))
            .mount(&mock.server)
            .await;

        let err = assert_err!(
            mock.client()
                .insert_documents("db", &sample_documents(), 1_000_000)
                .await
        );
        assert!(matches!(err, RagError::Api { status: 400, .. }));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_query_unknown_database_is_not_found() {
        let mock = MockRagService::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/vector-io/query"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "detail": "Vector DB ghost not found"
            })))
            .mount(&mock.server)
            .await;

        let err = assert_err!(mock.client().query("ghost", "q", &QueryParams::new()).await);
        assert!(matches!(err, RagError::NotFound(_)));
    }

    // ==================== Contract violations ====================

    #[tokio::test]
    async fn test_mismatched_chunks_and_scores_is_invalid_response() {
        let mock = MockRagService::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/vector-io/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "chunks": [{"content": "a", "metadata": {}}, {"content": "b", "metadata": {}}],
                "scores": [0.4]
            })))
            .mount(&mock.server)
            .await;

        let err = assert_err!(mock.client().query("db", "q", &QueryParams::new()).await);
        assert!(matches!(err, RagError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_malformed_json_is_invalid_response() {
        let mock = MockRagService::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/providers"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock.server)
            .await;

        let err = assert_err!(mock.client().list_providers().await);
        assert!(matches!(err, RagError::InvalidResponse(_)));
    }

    // ==================== Fetch failures ====================

    #[tokio::test]
    async fn test_binary_document_is_fetch_error() {
        let mock = MockRagService::start().await;
        Mock::given(method("GET"))
            .and(path("/docs/figure.png"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x89, b'P', b'N', b'G'], "image/png"))
            .mount(&mock.server)
            .await;

        let document = ragtool_client::Document::url("img", format!("{}/docs/figure.png", mock.uri()));
        let err = assert_err!(mock.client().insert_documents("db", &[document], 512).await);
        match err {
            RagError::Fetch { reason, .. } => assert!(reason.contains("image/png")),
            other => panic!("expected Fetch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_oversized_document_is_fetch_error() {
        let mock = MockRagService::start().await;
        Mock::given(method("GET"))
            .and(path("/docs/big.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("x".repeat(64), "text/plain"))
            .mount(&mock.server)
            .await;

        let client = mock.client_with(ConfigBuilder::new().max_document_bytes(16));
        let document = ragtool_client::Document::url("big", format!("{}/docs/big.txt", mock.uri()));
        let err = assert_err!(client.insert_documents("db", &[document], 512).await);
        assert!(matches!(err, RagError::Fetch { .. }));
    }

    // ==================== Transport ====================

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        // Bind and drop a server so the port is closed
        let uri = {
            let mock = MockRagService::start().await;
            mock.uri()
        };

        let client = RagClient::new(ConfigBuilder::new().base_url(&uri).timeout(2).build()).unwrap();
        let err = assert_err!(client.list_vector_dbs().await);
        assert!(matches!(err, RagError::Network(_)), "got {:?}", err);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = assert_err!(RagClient::new(ConfigBuilder::new().base_url("ftp://host").build()));
        assert!(err.is_config_error());
    }
}
