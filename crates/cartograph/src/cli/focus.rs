//! `cartograph focus` command implementation.

use std::path::Path;

use cartograph::{focus_set, GraphBuilder};
use colored::Colorize;

use super::display::{load_graph, print_items};

/// Run the focus command.
pub fn run(graph_path: &Path, node: &str, hops: u32) -> Result<(), cartograph::Error> {
    let data = load_graph(graph_path)?;
    let (graph, _) = GraphBuilder::new().build(data);

    let visible = focus_set(&graph, node, hops)?;

    println!(
        "Focus on {} within {} hops ({} nodes visible):",
        node.cyan().bold(),
        hops,
        visible.len().to_string().green()
    );
    println!();

    // Sort for deterministic output
    let mut ids: Vec<String> = visible.into_iter().collect();
    ids.sort();
    print_items(&ids, "(none)");

    Ok(())
}
