//! `cartograph scope` command implementation.

use std::path::Path;

use cartograph::scope_to_prefix;
use colored::Colorize;

use super::display::{load_graph, print_items};

/// Run the scope command.
pub fn run(graph_path: &Path, prefix: &str) -> Result<(), cartograph::Error> {
    let data = load_graph(graph_path)?;
    let scoped = scope_to_prefix(&data, prefix);

    println!("Scoped to {}:", prefix.cyan().bold());
    println!();
    println!(
        "  {}: {} of {} nodes, {} of {} edges",
        "Retained".white().bold(),
        scoped.nodes.len().to_string().green(),
        data.nodes.len(),
        scoped.edges.len().to_string().green(),
        data.edges.len()
    );
    println!();

    println!("  {}:", "Nodes".white().bold());
    let mut names: Vec<String> = scoped
        .nodes
        .iter()
        .map(|n| format!("{} ({})", n.name, n.kind.as_str()))
        .collect();
    names.sort();
    print_items(&names, "(nothing under this prefix)");

    Ok(())
}
