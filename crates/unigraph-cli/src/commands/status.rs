//! Graph status command.

use anyhow::Result;
use colored::Colorize;

use crate::config::AppConfig;
use super::connect_store;

/// Show node/relationship counts, per label.
pub async fn execute(config: &AppConfig) -> Result<()> {
    let store = connect_store(&config.graph).await?;
    let client = store.client();

    println!("{}", "Graph Status".bold());
    println!("{}", "─".repeat(40));
    println!("  URI:           {}", config.graph.uri.dimmed());

    let counts = client.get_counts().await?;
    println!("  Nodes:         {}", counts.nodes.to_string().cyan());
    println!("  Relationships: {}", counts.relationships.to_string().cyan());

    let labels = client.label_counts().await?;
    if !labels.is_empty() {
        println!();
        for (label, count) in labels {
            println!("  {:<15}{}", label, count);
        }
    }

    println!("{}", "─".repeat(40));

    Ok(())
}
