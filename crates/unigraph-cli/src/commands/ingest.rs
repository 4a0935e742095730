//! Standalone ingest: map one entry into the graph and exit.

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use unigraph_core::{ingest_file, AnchorPolicy, GraphStore, MemoryStore};

use crate::config::AppConfig;
use crate::output;
use super::connect_store;

#[derive(Args)]
pub struct IngestArgs {
    /// UniProt XML file, overrides config and UNIGRAPH_INPUT
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Delete everything in the graph before loading
    #[arg(long)]
    pub clear: bool,

    /// Map into memory and report counts without touching Neo4j
    #[arg(long)]
    pub dry_run: bool,

    /// Which Protein nodes entry-level relationships start from
    #[arg(long, value_enum)]
    pub anchor: Option<AnchorArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AnchorArg {
    /// The first (primary) accession only
    Primary,
    /// Every accession
    EveryAccession,
}

impl From<AnchorArg> for AnchorPolicy {
    fn from(arg: AnchorArg) -> Self {
        match arg {
            AnchorArg::Primary => AnchorPolicy::Primary,
            AnchorArg::EveryAccession => AnchorPolicy::EveryAccession,
        }
    }
}

pub async fn execute(args: IngestArgs, mut config: AppConfig) -> Result<()> {
    if let Some(input) = args.input {
        config.input.path = input;
    }
    if let Some(anchor) = args.anchor {
        config.mapping.anchor = anchor.into();
    }
    let options = config.mapping_options();

    println!(
        "{} {}",
        "Ingesting".bold(),
        config.input.path.display().to_string().cyan()
    );

    if args.dry_run {
        let store = MemoryStore::new();
        let report = ingest_file(&store, &config.input.path, &options).await?;
        println!("{}", "Dry run, nothing written to Neo4j.".yellow());
        output::print_report(&report);
        return Ok(());
    }

    let store = connect_store(&config.graph).await?;
    if args.clear {
        store.clear().await?;
        println!("{}", "Graph cleared.".dimmed());
    }

    let report = ingest_file(&store, &config.input.path, &options).await?;
    output::print_report(&report);

    Ok(())
}
