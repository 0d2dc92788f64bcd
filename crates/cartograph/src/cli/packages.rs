//! `cartograph packages` command implementation.

use std::path::Path;

use cartograph::detect_packages;
use colored::Colorize;

use super::display::load_graph;

/// Run the packages command.
pub fn run(graph_path: &Path) -> Result<(), cartograph::Error> {
    let data = load_graph(graph_path)?;
    let candidates = detect_packages(&data);

    if candidates.is_empty() {
        // A capability gate, not an error: the scoping UI is simply not
        // offered for this repository shape.
        println!(
            "{}",
            "Fewer than two package candidates detected; scoping is unavailable".dimmed()
        );
        return Ok(());
    }

    println!(
        "{} ({}):",
        "Package candidates".cyan().bold(),
        candidates.len()
    );
    for candidate in candidates {
        println!(
            "  {} {} ({} files)",
            "•".dimmed(),
            candidate.prefix.white().bold(),
            candidate.file_count
        );
    }

    Ok(())
}
