//! Analyze and suggest commands

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;

use super::input::read_records;
use super::output::Output;
use crate::domain::{AnalyzedTask, Strategy, TaskId};
use crate::engine::Prioritizer;
use crate::storage::SessionStore;

/// Analyze a task file and store it as the current session
pub fn analyze<S: SessionStore>(
    output: &Output,
    engine: &Prioritizer<S>,
    file: Option<&Path>,
    strategy: Strategy,
    today: NaiveDate,
) -> Result<()> {
    output.verbose_ctx(
        "analyze",
        &format!("Reading tasks from {}", file.map_or("stdin".into(), |p| p.display().to_string())),
    );
    let records = read_records(file)?;

    let analysis = engine.analyze(&records, strategy, today)?;
    output.verbose_ctx(
        "analyze",
        &format!(
            "Analyzed {} task(s), {} cycle(s), {} dangling dependency reference(s)",
            analysis.tasks.len(),
            analysis.cycles.len(),
            analysis.dangling.len()
        ),
    );
    for (task, missing) in &analysis.dangling {
        output.verbose_ctx(
            "analyze",
            &format!("{} depends on {}, which is not in the set (treated as done)", task, missing),
        );
    }

    if output.is_json() {
        let fingerprint = engine.session()?.map(|s| s.fingerprint.clone());
        output.data(&serde_json::json!({
            "strategy": strategy,
            "today": today,
            "count": analysis.tasks.len(),
            "tasks": analysis.tasks,
            "cycles": analysis.cycles,
            "session": fingerprint,
        }));
        return Ok(());
    }

    if analysis.tasks.is_empty() {
        println!("No tasks to analyze.");
        return Ok(());
    }

    println!(
        "Analyzed {} task(s) with {} (today {}):",
        analysis.tasks.len(),
        strategy,
        today
    );
    print_table(&analysis.tasks);

    for cycle in &analysis.cycles {
        output.warn(&format!("circular dependency among: {}", join_ids(cycle)));
    }

    Ok(())
}

/// Show the top-ranked tasks from the current session
pub fn suggest<S: SessionStore>(
    output: &Output,
    engine: &Prioritizer<S>,
    strategy: Strategy,
    today: NaiveDate,
) -> Result<()> {
    let shortlist = engine.suggest(strategy, today)?;
    output.verbose_ctx(
        "suggest",
        &format!("Ranked {} suggestion(s) with {}", shortlist.len(), strategy),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "strategy": strategy,
            "today": today,
            "suggested_count": shortlist.len(),
            "suggested_tasks": shortlist,
        }));
    } else if shortlist.is_empty() {
        println!("No tasks to suggest. Run 'taskrank analyze' first.");
    } else {
        println!("Suggested next ({}):", strategy);
        print_table(&shortlist);
    }

    Ok(())
}

fn print_table(tasks: &[AnalyzedTask]) {
    println!("{:<16} {:>6} {:<7} {:<6} TITLE", "ID", "SCORE", "BAND", "CYCLE");
    println!("{}", "-".repeat(72));
    for task in tasks {
        println!(
            "{:<16} {:>6.2} {:<7} {:<6} {}",
            task.id(),
            task.priority_score,
            task.band(),
            if task.circular_dependency { "yes" } else { "" },
            task.task.title
        );
        println!("{:<16} {}", "", task.explanation);
    }
}

pub(super) fn join_ids(ids: &[TaskId]) -> String {
    ids.iter()
        .map(TaskId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
