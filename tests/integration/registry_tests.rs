//! Vector database registry integration tests

#[cfg(test)]
mod tests {
    use crate::common::mock_service::{TEST_API_KEY, vector_db_json};
    use crate::common::{DocumentFactory, MockRagService};
    use crate::{assert_err, assert_ok};
    use ragtool_client::{RagError, RagService, RagWorkflow, clear_registry, with_clean_registry};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[tokio::test]
    async fn test_list_accepts_wrapped_and_bare_arrays() {
        let mock = MockRagService::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/vector-dbs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [vector_db_json("a"), vector_db_json("b")]
            })))
            .up_to_n_times(1)
            .mount(&mock.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/vector-dbs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([vector_db_json("c")])))
            .mount(&mock.server)
            .await;

        let client = mock.client();
        let wrapped = assert_ok!(client.list_vector_db_ids().await);
        assert_eq!(wrapped, vec!["a", "b"]);
        let bare = assert_ok!(client.list_vector_db_ids().await);
        assert_eq!(bare, vec!["c"]);
    }

    #[tokio::test]
    async fn test_register_sends_registration_and_bearer_token() {
        let mock = MockRagService::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/vector-dbs"))
            .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
            .and(body_json(json!({
                "vector_db_id": "test_vector_db",
                "embedding_model": "all-MiniLM-L6-v2",
                "embedding_dimension": 384,
                "provider_id": "faiss"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(vector_db_json("test_vector_db")))
            .expect(1)
            .mount(&mock.server)
            .await;

        let db = assert_ok!(
            mock.client()
                .register_vector_db(&DocumentFactory::registration("test_vector_db"))
                .await
        );
        assert_eq!(db.identifier, "test_vector_db");
        assert_eq!(db.embedding_dimension, 384);
        assert_eq!(db.provider_resource_id.as_deref(), Some("test_vector_db"));
    }

    #[tokio::test]
    async fn test_register_with_empty_body_echoes_registration() {
        let mock = MockRagService::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/vector-dbs"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock.server)
            .await;

        let db = assert_ok!(
            mock.client()
                .register_vector_db(&DocumentFactory::registration("echoed"))
                .await
        );
        assert_eq!(db.identifier, "echoed");
        assert_eq!(db.embedding_model, "all-MiniLM-L6-v2");
        assert_eq!(db.provider_id, "faiss");
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_registration_error() {
        let mock = MockRagService::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/vector-dbs"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "detail": "Vector DB test_vector_db already exists"
            })))
            .mount(&mock.server)
            .await;

        let err = assert_err!(
            mock.client()
                .register_vector_db(&DocumentFactory::registration("test_vector_db"))
                .await
        );
        match err {
            RagError::Registration(message) => {
                assert!(message.contains("test_vector_db"));
                assert!(message.contains("already exists"));
            }
            other => panic!("expected Registration, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_registration_never_reaches_service() {
        let mock = MockRagService::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/vector-dbs"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock.server)
            .await;

        let mut registration = DocumentFactory::registration("bad");
        registration.embedding_dimension = 0;
        let err = assert_err!(mock.client().register_vector_db(&registration).await);
        assert!(matches!(err, RagError::Registration(_)));
    }

    #[tokio::test]
    async fn test_get_unknown_vector_db_is_none() {
        let mock = MockRagService::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/vector-dbs/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "not found"})))
            .mount(&mock.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/vector-dbs/present"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vector_db_json("present")))
            .mount(&mock.server)
            .await;

        let client = mock.client();
        assert!(assert_ok!(client.get_vector_db("missing").await).is_none());
        let present = assert_ok!(client.get_vector_db("present").await);
        assert_eq!(present.map(|db| db.identifier).as_deref(), Some("present"));
    }

    #[tokio::test]
    async fn test_unregister_unknown_is_not_found() {
        let mock = MockRagService::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v1/vector-dbs/ghost"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "detail": "Vector DB 'ghost' not found"
            })))
            .mount(&mock.server)
            .await;

        let err = assert_err!(mock.client().unregister_vector_db("ghost").await);
        assert!(err.is_not_found(), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_clear_registry_unregisters_every_database() {
        let mock = MockRagService::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/vector-dbs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [vector_db_json("one"), vector_db_json("two")]
            })))
            .mount(&mock.server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v1/vector-dbs/one"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock.server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v1/vector-dbs/two"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock.server)
            .await;

        let removed = assert_ok!(clear_registry(&mock.client()).await);
        assert_eq!(removed, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_scope_releases_after_failed_body() {
        let mock = MockRagService::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/vector-dbs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&mock.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/vector-dbs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vector_db_json("scoped")))
            .mount(&mock.server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v1/vector-dbs/scoped"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock.server)
            .await;

        let client = mock.client();
        let outcome: ragtool_client::Result<()> = with_clean_registry(&client, |scope| {
            let client = client.clone();
            async move {
                scope
                    .register(&client, &DocumentFactory::registration("scoped"))
                    .await?;
                Err(RagError::InvalidRequest("body failed".to_string()))
            }
        })
        .await;

        let err = assert_err!(outcome);
        assert!(matches!(err, RagError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_workflow_through_trait_object() {
        let mock = MockRagService::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/vector-dbs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([vector_db_json("x")])))
            .mount(&mock.server)
            .await;

        let service: Box<dyn RagService> = Box::new(mock.client());
        let dbs = assert_ok!(service.list_vector_dbs().await);
        assert_eq!(dbs.len(), 1);

        let workflow = RagWorkflow::new(mock.client());
        assert_eq!(assert_ok!(workflow.list().await), vec!["x"]);
    }
}
