//! `cartograph build` command implementation.

use std::path::Path;

use cartograph::GraphBuilder;
use colored::Colorize;

use super::display::load_graph;

/// Run the build command.
pub fn run(graph_path: &Path) -> Result<(), cartograph::Error> {
    let data = load_graph(graph_path)?;
    let (graph, stats) = GraphBuilder::new().build(data);

    println!("{}", "Graph build".cyan().bold());
    println!();
    println!(
        "  {}: {} nodes, {} edges",
        "Built".white().bold(),
        stats.nodes_added.to_string().green(),
        stats.edges_added.to_string().green()
    );
    println!(
        "  {}: {} communities, {} processes",
        "Metadata".white().bold(),
        graph.communities().len(),
        graph.processes().len()
    );

    let dropped =
        stats.duplicate_nodes + stats.dangling_edges + stats.duplicate_edges + stats.self_edges;
    if dropped > 0 {
        println!();
        println!(
            "  {}: {} entries dropped",
            "Dropped".yellow().bold(),
            dropped.to_string().yellow()
        );
        if stats.duplicate_nodes > 0 {
            println!("    {} duplicate node ids", stats.duplicate_nodes);
        }
        if stats.dangling_edges > 0 {
            println!("    {} edges with a missing endpoint", stats.dangling_edges);
        }
        if stats.duplicate_edges > 0 {
            println!("    {} duplicate edge pairs", stats.duplicate_edges);
        }
        if stats.self_edges > 0 {
            println!("    {} self-edges", stats.self_edges);
        }
    }
    if stats.clamped_confidences > 0 {
        println!(
            "  {}: {} confidences clamped into [0, 1]",
            "Clamped".yellow().bold(),
            stats.clamped_confidences
        );
    }

    println!();
    println!("  {}: {:.1?}", "Duration".white().bold(), stats.duration);

    Ok(())
}
