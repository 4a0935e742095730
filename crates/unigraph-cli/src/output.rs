//! Terminal output formatting.

use colored::Colorize;
use unigraph_core::IngestReport;

/// Print the nodes and relationships created by one ingest.
pub fn print_report(report: &IngestReport) {
    println!("\n{}", "Ingest complete:".green().bold());

    println!("  {:<18} {}", "Nodes".bold(), report.nodes_created().to_string().cyan());
    for (label, count) in &report.nodes {
        println!("    {:<16} {}", label.as_str(), count);
    }

    println!(
        "  {:<18} {}",
        "Relationships".bold(),
        report.relationships_created().to_string().cyan()
    );
    for (rel, count) in &report.relationships {
        println!("    {:<16} {}", rel.as_str(), count);
    }
}
