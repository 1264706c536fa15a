//! Ranking and suggestions
//!
//! Ranked order is a total order over analyzed tasks:
//!
//! 1. `priority_score`, highest first
//! 2. tasks off any cycle before tasks on one
//! 3. `urgency`, highest first
//! 4. `id`, ascending
//!
//! IDs are unique within a set, so the order never depends on input order.

use std::cmp::Ordering;

use super::task::AnalyzedTask;

/// Number of tasks returned by a suggestion
pub const DEFAULT_SUGGESTIONS: usize = 3;

/// Compares two analyzed tasks in ranked order
pub fn rank_order(a: &AnalyzedTask, b: &AnalyzedTask) -> Ordering {
    b.priority_score
        .total_cmp(&a.priority_score)
        .then_with(|| a.circular_dependency.cmp(&b.circular_dependency))
        .then_with(|| b.urgency.total_cmp(&a.urgency))
        .then_with(|| a.id().cmp(b.id()))
}

/// Sorts tasks into ranked order
pub fn rank(mut tasks: Vec<AnalyzedTask>) -> Vec<AnalyzedTask> {
    tasks.sort_by(rank_order);
    tasks
}

/// Returns the top `limit` tasks in ranked order
pub fn top(tasks: Vec<AnalyzedTask>, limit: usize) -> Vec<AnalyzedTask> {
    let mut ranked = rank(tasks);
    ranked.truncate(limit);
    ranked
}
