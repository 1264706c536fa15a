//! One analysis pass over a task set
//!
//! Graph build, cycle detection and per-task scoring. The pass borrows the
//! tasks and returns independent, owned results in input order.

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::graph::DependencyGraph;
use super::id::TaskId;
use super::strategy::{Factors, Strategy};
use super::task::{AnalyzedTask, Task};

/// Output of [`analyze`]
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Analyzed tasks in input order
    pub tasks: Vec<AnalyzedTask>,

    /// Each dependency cycle as a sorted group of IDs
    pub cycles: Vec<Vec<TaskId>>,

    /// Dependencies naming tasks outside the set, as (task, missing dependency)
    pub dangling: Vec<(TaskId, TaskId)>,
}

/// Scores every task under `strategy` as of `today`
pub fn analyze(tasks: &[Task], strategy: Strategy, today: NaiveDate) -> Analysis {
    let graph = DependencyGraph::from_tasks(tasks);
    let report = graph.detect_cycles();

    if !report.is_acyclic() {
        warn!(
            cycles = report.cycles().len(),
            tasks = report.flagged_count(),
            "circular dependencies detected"
        );
    }

    let analyzed: Vec<AnalyzedTask> = tasks
        .iter()
        .map(|task| {
            let circular = report.is_circular(&task.id);
            let factors = Factors::for_task(task, today, graph.dependent_count(&task.id));
            let score = strategy.score(task, &factors, circular);

            AnalyzedTask {
                task: task.clone(),
                priority_score: score.value,
                urgency: factors.urgency,
                strategy,
                circular_dependency: circular,
                explanation: score.explanation,
            }
        })
        .collect();

    debug!(
        tasks = analyzed.len(),
        edges = graph.edge_count(),
        dangling = graph.dangling().len(),
        %strategy,
        %today,
        "analysis pass complete"
    );

    Analysis {
        tasks: analyzed,
        cycles: report.cycles().to_vec(),
        dangling: graph.dangling().to_vec(),
    }
}
