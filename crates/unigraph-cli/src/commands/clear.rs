//! Delete the whole graph.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use unigraph_core::GraphStore;

use crate::config::AppConfig;
use super::connect_store;

#[derive(Args)]
pub struct ClearArgs {
    /// Confirm deletion of all nodes and relationships
    #[arg(long)]
    pub yes: bool,
}

pub async fn execute(args: ClearArgs, config: &AppConfig) -> Result<()> {
    if !args.yes {
        bail!("Refusing to clear {} without --yes", config.graph.uri);
    }

    let store = connect_store(&config.graph).await?;
    let before = store.client().get_counts().await?;
    store.clear().await?;

    println!(
        "{} {} nodes and {} relationships deleted.",
        "Graph cleared:".yellow().bold(),
        before.nodes,
        before.relationships
    );
    Ok(())
}
