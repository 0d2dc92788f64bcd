//! `cartograph stats` command implementation.

use std::collections::HashMap;
use std::path::Path;

use cartograph::{EdgeKind, GraphBuilder, NodeKind};
use colored::Colorize;

use super::display::load_graph;

/// Run the stats command.
pub fn run(graph_path: &Path) -> Result<(), cartograph::Error> {
    let data = load_graph(graph_path)?;
    let (graph, _) = GraphBuilder::new().build(data);

    println!("{}", "Cartograph Graph Statistics".cyan().bold());
    println!();

    // Node counts by kind
    let mut node_kinds: HashMap<NodeKind, usize> = HashMap::new();
    for positioned in graph.nodes() {
        *node_kinds.entry(positioned.node.kind).or_insert(0) += 1;
    }
    println!(
        "  {}: {} total",
        "Nodes".white().bold(),
        graph.node_count().to_string().green()
    );
    // Sort by count descending, then by kind for deterministic output
    let mut kind_counts: Vec<_> = node_kinds.into_iter().collect();
    kind_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
    for (kind, count) in kind_counts {
        println!("    {}: {count}", kind.as_str().dimmed());
    }
    println!();

    // Edge counts by kind
    let mut edge_kinds: HashMap<EdgeKind, usize> = HashMap::new();
    for edge in graph.edges() {
        *edge_kinds.entry(edge.kind).or_insert(0) += 1;
    }
    println!(
        "  {}: {} total",
        "Edges".white().bold(),
        graph.edge_count().to_string().green()
    );
    let mut edge_counts: Vec<_> = edge_kinds.into_iter().collect();
    edge_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
    for (kind, count) in edge_counts {
        println!("    {}: {count}", kind.as_str().dimmed());
    }
    println!();

    // Communities and processes
    println!(
        "  {}: {}",
        "Communities".white().bold(),
        graph.communities().len().to_string().green()
    );
    for community in graph.communities() {
        println!(
            "    {}: {} symbols, cohesion {:.2}",
            community.label.dimmed(),
            community.symbol_count,
            community.cohesion
        );
    }
    println!(
        "  {}: {}",
        "Processes".white().bold(),
        graph.processes().len().to_string().green()
    );
    for process in graph.processes() {
        println!(
            "    {}: {} steps",
            process.label.dimmed(),
            process.step_count
        );
    }

    Ok(())
}
