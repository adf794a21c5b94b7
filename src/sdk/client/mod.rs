//! RAG client module
//!
//! HTTP implementation of [`RagService`](crate::sdk::RagService) against the
//! service's JSON API, plus eager fetching of URL-referenced documents.

mod client;
mod documents;
mod fetch;
mod providers;
mod query;
mod rag_service;
mod vector_dbs;


// Re-export public types and the main client
pub use client::RagClient;
pub use fetch::{DocumentFetcher, FetchedDocument};
