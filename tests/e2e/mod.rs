//! End-to-end tests for ragtool-client
//!
//! These run against a live RAG service and empty its registry.
//! Run with: cargo test -- --ignored
//!
//! Required environment variables:
//! - RAGTOOL_BASE_URL: service endpoint
//! - RAGTOOL_API_KEY: optional bearer token
