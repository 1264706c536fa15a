//! Task domain model
//!
//! A [`Task`] is a caller-submitted unit of work. An [`AnalyzedTask`] is the
//! engine's output for one task: the original record plus its score, the
//! urgency used to rank it, its cycle flag and an explanation.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::id::TaskId;
use super::strategy::Strategy;

/// Lowest accepted importance rating
pub const MIN_IMPORTANCE: u8 = 1;

/// Highest accepted importance rating
pub const MAX_IMPORTANCE: u8 = 10;

/// A unit of work submitted for analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier within the submitted set
    pub id: TaskId,

    /// Human-readable title
    pub title: String,

    /// Calendar due date, if the task has a deadline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Effort estimate in hours, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,

    /// Importance rating, 1 through 10
    pub importance: u8,

    /// IDs of tasks that must be considered complete first.
    /// IDs absent from the submitted set are external prerequisites.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dependencies: BTreeSet<TaskId>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeSet<TaskId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeSet<TaskId>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Task {
    /// Creates a task with no deadline, unknown effort and no dependencies
    pub fn new(id: TaskId, title: impl Into<String>, importance: u8) -> Self {
        Self {
            id,
            title: title.into(),
            due_date: None,
            estimated_hours: None,
            importance,
            dependencies: BTreeSet::new(),
        }
    }

    /// Sets the due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the effort estimate
    pub fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    /// Adds a dependency; returns false if it was already present
    pub fn add_dependency(&mut self, depends_on: TaskId) -> bool {
        self.dependencies.insert(depends_on)
    }

    /// Returns true if the task lists its own ID as a dependency
    pub fn depends_on_itself(&self) -> bool {
        self.dependencies.contains(&self.id)
    }
}

/// Presentation bucket for a priority score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityBand {
    High,
    Medium,
    Low,
}

impl PriorityBand {
    /// Buckets a score: 8 and above is high, 5 and above is medium
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            PriorityBand::High
        } else if score >= 5.0 {
            PriorityBand::Medium
        } else {
            PriorityBand::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityBand::High => "high",
            PriorityBand::Medium => "medium",
            PriorityBand::Low => "low",
        }
    }
}

impl fmt::Display for PriorityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A task annotated by one analysis pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedTask {
    /// The submitted record
    #[serde(flatten)]
    pub task: Task,

    /// Final score in [0, 10], rounded to two decimals
    pub priority_score: f64,

    /// Urgency used for scoring and tie-breaking
    pub urgency: f64,

    /// Strategy that produced the score
    pub strategy: Strategy,

    /// True if the task sits on a dependency cycle within the set
    pub circular_dependency: bool,

    /// Which factors drove the score
    pub explanation: String,
}

impl AnalyzedTask {
    pub fn id(&self) -> &TaskId {
        &self.task.id
    }

    pub fn band(&self) -> PriorityBand {
        PriorityBand::from_score(self.priority_score)
    }
}
