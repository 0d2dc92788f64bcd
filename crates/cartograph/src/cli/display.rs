//! Common display utilities for CLI commands.

use std::path::Path;

use cartograph::GraphData;
use colored::Colorize;

const MAX_DISPLAY_ITEMS: usize = 10;

/// Load a raw graph payload from disk.
pub fn load_graph(path: &Path) -> Result<GraphData, cartograph::Error> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Display a list of items with optional truncation.
///
/// Shows up to `MAX_DISPLAY_ITEMS` items with bullet points. If there are
/// more, shows "... and N more". If empty, shows the provided
/// `empty_message`.
pub fn print_items(items: &[String], empty_message: &str) {
    if items.is_empty() {
        println!("    {}", empty_message.dimmed());
        return;
    }

    for item in items.iter().take(MAX_DISPLAY_ITEMS) {
        println!("    {} {item}", "•".dimmed());
    }

    if items.len() > MAX_DISPLAY_ITEMS {
        println!(
            "    {} ... and {} more",
            "•".dimmed(),
            items.len() - MAX_DISPLAY_ITEMS
        );
    }
}
