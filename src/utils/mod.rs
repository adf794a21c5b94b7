//! Utility modules for the RAG client
//!
//! - **logging**: tracing subscriber setup shared by the binary and tests

pub mod logging;

pub use logging::{LogLevel, init_logging};
