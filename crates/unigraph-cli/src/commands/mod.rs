//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use unigraph_core::{IngestError, IngestResult};
use unigraph_graph::{GraphClient, GraphConfig, Neo4jStore};

use crate::config::AppConfig;

pub mod clear;
pub mod ingest;
pub mod schedule;
pub mod status;

/// Load a UniProt entry into a Neo4j knowledge graph
#[derive(Parser)]
#[command(name = "unigraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the config file (defaults to ./unigraph.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Neo4j URI, overrides config and NEO4J_URI
    #[arg(long, global = true)]
    pub uri: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Map the configured entry into the graph once
    Ingest(ingest::IngestArgs),

    /// Run the ingest as a daily pipeline task
    Schedule(schedule::ScheduleArgs),

    /// Show node and relationship counts
    Status,

    /// Delete every node and relationship
    Clear(clear::ClearArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(uri) = self.uri {
            config.graph.uri = uri;
        }

        match self.command {
            Commands::Ingest(args) => ingest::execute(args, config).await,
            Commands::Schedule(args) => schedule::execute(args, config).await,
            Commands::Status => status::execute(&config).await,
            Commands::Clear(args) => clear::execute(args, &config).await,
        }
    }
}

/// Connect to Neo4j, reporting any failure as a store outage.
pub async fn connect_store(config: &GraphConfig) -> IngestResult<Neo4jStore> {
    let client = GraphClient::connect(config)
        .await
        .map_err(|e| IngestError::store(format!("{:#}", e)))?;
    Ok(Neo4jStore::new(client))
}
