//! Domain models for taskrank
//!
//! Contains the prioritization logic without any I/O concerns.

mod id;
mod task;
mod graph;
mod urgency;
mod strategy;
mod validate;
mod analysis;
pub mod rank;

pub use id::{IdError, TaskId};
pub use task::{AnalyzedTask, PriorityBand, Task, MAX_IMPORTANCE, MIN_IMPORTANCE};
pub use graph::{CycleReport, DependencyGraph};
pub use urgency::{days_until, urgency};
pub use strategy::{effort_score, Factors, Score, Strategy, StrategyError};
pub use validate::{parse_tasks, FieldIssue, ValidationError};
pub use analysis::{analyze, Analysis};
