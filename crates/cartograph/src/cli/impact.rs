//! `cartograph impact` command implementation.

use std::path::Path;

use cartograph::{
    GraphBuilder, ImpactAnalyzer, ImpactDirection, ImpactOptions, ImpactReport, Risk,
};
use colored::Colorize;

use super::display::{load_graph, print_items};

/// Run the impact command.
pub fn run(
    graph_path: &Path,
    symbol: &str,
    depth: u32,
    floor: f32,
    downstream: bool,
) -> Result<(), cartograph::Error> {
    let data = load_graph(graph_path)?;
    let (graph, _) = GraphBuilder::new().build(data);

    let options = ImpactOptions {
        direction: if downstream {
            ImpactDirection::Downstream
        } else {
            ImpactDirection::Upstream
        },
        max_depth: depth,
        confidence_floor: floor,
    };
    let report = ImpactAnalyzer::new(&graph).analyze(symbol, &options)?;

    println!(
        "Blast radius for \"{}\" ({}):",
        report.target_name.cyan().bold(),
        if downstream { "downstream" } else { "upstream" }
    );
    print_report(&report);

    Ok(())
}

/// Display an impact report.
fn print_report(report: &ImpactReport) {
    println!();

    let risk = match report.risk {
        Risk::Low => report.risk.as_str().green(),
        Risk::Medium => report.risk.as_str().yellow(),
        Risk::High => report.risk.as_str().red(),
        Risk::Critical => report.risk.as_str().red().bold(),
    };
    println!(
        "  {}: {} ({} affected symbols)",
        "Risk".white().bold(),
        risk,
        report.total_affected()
    );
    println!();

    if report.by_depth.is_empty() {
        println!("    {}", "(no dependents found)".dimmed());
    }
    for bucket in &report.by_depth {
        println!(
            "  {} {} ({} symbols):",
            "Depth".white().bold(),
            bucket.depth,
            bucket.symbols.len().to_string().green()
        );
        let names: Vec<String> = bucket.symbols.iter().map(|s| s.name.clone()).collect();
        print_items(&names, "(none)");
        println!();
    }

    println!(
        "  {} ({}):",
        "Affected flows".white().bold(),
        report.affected_processes.len()
    );
    let labels: Vec<String> = report
        .affected_processes
        .iter()
        .map(|p| p.label.clone())
        .collect();
    print_items(&labels, "(none)");
}
