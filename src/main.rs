//! ragtool - command-line front end for a remote RAG service

#![allow(missing_docs)]

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use ragtool_client::sdk::{
    ClientConfig, Document, DocumentContent, QueryParams, RagClient, RagWorkflow,
    VectorDbRegistration, clear_registry,
};
use ragtool_client::utils::{LogLevel, init_logging};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

#[derive(Debug, Parser)]
#[command(name = "ragtool", version, long_version = LONG_VERSION)]
#[command(about = "Register vector databases, insert documents and run similarity queries")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "RAGTOOL_CONFIG")]
    config: Option<PathBuf>,

    /// Service base URL, overrides the configuration
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log verbosity (RUST_LOG takes precedence)
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List providers configured on the service
    Providers {
        /// Only providers that can back a vector database
        #[arg(long)]
        vector_io: bool,
    },
    /// List registered vector databases
    List,
    /// Register a vector database
    Register {
        /// Identifier to register
        vector_db_id: String,
        #[arg(long)]
        embedding_model: Option<String>,
        #[arg(long)]
        embedding_dimension: Option<u32>,
        #[arg(long)]
        provider_id: Option<String>,
    },
    /// Unregister a vector database
    Unregister { vector_db_id: String },
    /// Unregister every vector database
    Clear,
    /// Insert documents into a vector database
    Insert {
        /// Target vector database
        #[arg(long = "db")]
        vector_db_id: String,
        /// Inline or URL document as ID=CONTENT; URLs are detected automatically
        #[arg(long = "doc", value_parser = parse_document)]
        documents: Vec<Document>,
        /// JSON file holding an array of documents
        #[arg(long)]
        file: Option<PathBuf>,
        /// MIME type applied to --doc documents
        #[arg(long)]
        mime_type: Option<String>,
        /// Chunk size hint, defaults to the configured value
        #[arg(long)]
        chunk_size: Option<u32>,
    },
    /// Query a vector database
    Query {
        /// Target vector database
        #[arg(long = "db")]
        vector_db_id: String,
        /// Query text
        query: String,
        #[arg(long)]
        max_chunks: Option<usize>,
        #[arg(long)]
        score_threshold: Option<f32>,
    },
}

fn parse_document(raw: &str) -> Result<Document, String> {
    let (id, content) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=CONTENT, got {}", raw))?;
    if id.trim().is_empty() {
        return Err("document id must not be empty".to_string());
    }
    Ok(Document {
        document_id: id.trim().to_string(),
        content: DocumentContent::classify(content),
        mime_type: None,
        metadata: Default::default(),
    })
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::from_env()?,
    };
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.trim_end_matches('/').to_string();
        config.validate()?;
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let defaults = config.defaults.clone();
    let chunk_size = config.settings.default_chunk_size_in_tokens;
    let workflow = RagWorkflow::new(RagClient::new(config)?).with_chunk_size(chunk_size);

    match cli.command {
        Command::Providers { vector_io } => {
            let providers = if vector_io {
                workflow.require_vector_io_providers().await?
            } else {
                workflow.service().list_providers().await?
            };
            print_json(&providers)
        }
        Command::List => print_json(&workflow.service().list_vector_dbs().await?),
        Command::Register {
            vector_db_id,
            embedding_model,
            embedding_dimension,
            provider_id,
        } => {
            let registration = VectorDbRegistration::new(
                vector_db_id,
                embedding_model.unwrap_or(defaults.embedding_model),
                embedding_dimension.unwrap_or(defaults.embedding_dimension),
                provider_id.unwrap_or(defaults.provider_id),
            );
            print_json(&workflow.register(&registration).await?)
        }
        Command::Unregister { vector_db_id } => {
            workflow.unregister(&vector_db_id).await?;
            print_json(&serde_json::json!({ "unregistered": vector_db_id }))
        }
        Command::Clear => {
            let removed = clear_registry(workflow.service()).await?;
            print_json(&serde_json::json!({ "unregistered": removed }))
        }
        Command::Insert {
            vector_db_id,
            mut documents,
            file,
            mime_type,
            chunk_size,
        } => {
            if let Some(mime_type) = mime_type {
                for document in &mut documents {
                    document.mime_type = Some(mime_type.clone());
                }
            }
            if let Some(path) = file {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                let from_file: Vec<Document> = serde_json::from_str(&raw)
                    .with_context(|| format!("parsing documents in {}", path.display()))?;
                documents.extend(from_file);
            }
            if documents.is_empty() {
                bail!("no documents given; use --doc ID=CONTENT or --file");
            }

            let chunk_size = chunk_size.unwrap_or(workflow.chunk_size_in_tokens());
            workflow
                .insert_documents_with_chunk_size(&vector_db_id, &documents, chunk_size)
                .await?;
            print_json(&serde_json::json!({
                "vector_db_id": vector_db_id,
                "inserted": documents.len(),
            }))
        }
        Command::Query {
            vector_db_id,
            query,
            max_chunks,
            score_threshold,
        } => {
            let params = QueryParams {
                max_chunks,
                score_threshold,
            };
            print_json(
                &workflow
                    .query_with_params(&vector_db_id, &query, &params)
                    .await?,
            )
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.log_level, cli.json_logs);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
