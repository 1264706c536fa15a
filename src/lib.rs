//! taskrank - task prioritization and dependency analysis
//!
//! Scores a task list under a selectable strategy, flags dependency cycles
//! and suggests what to work on next. The most recently analyzed task set is
//! kept as a session so suggestions can be re-ranked later.

pub mod domain;
pub mod storage;
pub mod engine;
pub mod cli;

pub use domain::{AnalyzedTask, Strategy, Task, TaskId};
pub use engine::Prioritizer;
