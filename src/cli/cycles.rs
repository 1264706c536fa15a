//! Dependency check command
//!
//! Reports cycles and dangling references in a task file without running an
//! analysis or touching the session.

use std::path::Path;

use anyhow::Result;

use super::analyze::join_ids;
use super::input::read_records;
use super::output::Output;
use crate::domain::{parse_tasks, DependencyGraph};

pub fn run(output: &Output, file: Option<&Path>) -> Result<()> {
    let tasks = parse_tasks(&read_records(file)?)?;
    let graph = DependencyGraph::from_tasks(&tasks);
    let report = graph.detect_cycles();

    output.verbose_ctx(
        "cycles",
        &format!("Checked {} task(s), {} edge(s)", graph.len(), graph.edge_count()),
    );

    if output.is_json() {
        let dangling: Vec<_> = graph
            .dangling()
            .iter()
            .map(|(task, missing)| serde_json::json!({ "task": task, "missing": missing }))
            .collect();

        output.data(&serde_json::json!({
            "tasks": graph.len(),
            "cycles": report.cycles(),
            "circular_tasks": report.flagged_count(),
            "dangling": dangling,
        }));
        return Ok(());
    }

    if report.is_acyclic() {
        println!("No circular dependencies among {} task(s).", graph.len());
    } else {
        println!(
            "Circular dependencies ({} cycle(s), {} task(s)):",
            report.cycles().len(),
            report.flagged_count()
        );
        for cycle in report.cycles() {
            println!("  {}", join_ids(cycle));
        }
    }

    if !graph.dangling().is_empty() {
        println!();
        println!("External dependencies (not in this set, treated as done):");
        for (task, missing) in graph.dangling() {
            println!("  {} -> {}", task, missing);
        }
    }

    Ok(())
}
