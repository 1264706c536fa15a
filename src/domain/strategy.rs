//! Scoring strategies
//!
//! A strategy turns a task's factors into a priority score in [0, 10] and an
//! explanation. The set of strategies is closed; unknown names are rejected
//! when parsed, never at scoring time.
//!
//! ## Factors
//!
//! | Factor | Source | Range |
//! |--------|--------|-------|
//! | urgency | due date vs. today | 0-10 |
//! | importance | importance rating | 1-10 |
//! | effort | estimated hours (low hours score high) | 1-10, unknown = 5 |
//! | dependency impact | in-set tasks blocked by this one | 0-10 (capped) |
//!
//! Every strategy weights the four factors with weights summing to one, so
//! every score stays within [0, 10]. A task on a dependency cycle has its
//! score halved under every strategy.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::task::Task;
use super::urgency::urgency;

/// Effort score used when a task has no estimate
pub const UNKNOWN_EFFORT_SCORE: f64 = 5.0;

/// Upper bound of the dependency impact factor
const MAX_DEPENDENCY_IMPACT: f64 = 10.0;

/// Multiplier applied to tasks on a dependency cycle
pub const CIRCULAR_PENALTY: f64 = 0.5;

#[derive(Debug, Error, PartialEq)]
pub enum StrategyError {
    #[error("Unknown strategy '{0}': expected one of smart_balance, fastest_wins, high_impact, deadline_driven")]
    Unknown(String),
}

/// A named weighting policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Blends urgency, importance, effort and dependency impact
    #[default]
    SmartBalance,
    /// Rewards quick wins
    FastestWins,
    /// Importance dominates
    HighImpact,
    /// Urgency dominates
    DeadlineDriven,
}

type ScoreFn = fn(&Factors) -> f64;

impl Strategy {
    /// All strategies, in display order
    pub const ALL: [Strategy; 4] = [
        Strategy::SmartBalance,
        Strategy::FastestWins,
        Strategy::HighImpact,
        Strategy::DeadlineDriven,
    ];

    /// The snake_case tag used on the wire and the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::SmartBalance => "smart_balance",
            Strategy::FastestWins => "fastest_wins",
            Strategy::HighImpact => "high_impact",
            Strategy::DeadlineDriven => "deadline_driven",
        }
    }

    /// Label shown in explanations
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::SmartBalance => {
                "Smart Balance (blends urgency, impact, effort, dependencies)"
            }
            Strategy::FastestWins => "Fastest Wins (prioritizes low effort tasks)",
            Strategy::HighImpact => "High Impact (importance over everything)",
            Strategy::DeadlineDriven => "Deadline Driven (due dates dominate)",
        }
    }

    fn scorer(self) -> ScoreFn {
        match self {
            Strategy::SmartBalance => smart_balance,
            Strategy::FastestWins => fastest_wins,
            Strategy::HighImpact => high_impact,
            Strategy::DeadlineDriven => deadline_driven,
        }
    }

    /// Scores one task
    ///
    /// The result is rounded to two decimals and explains every factor.
    pub fn score(&self, task: &Task, factors: &Factors, circular: bool) -> Score {
        let mut value = (self.scorer())(factors);
        let mut parts = factors.describe(task);
        parts.push(format!("Strategy: {}", self.label()));

        if circular {
            value *= CIRCULAR_PENALTY;
            parts.push(
                "Warning: this task is part of a circular dependency, score halved".to_string(),
            );
        }

        Score {
            value: round2(value.clamp(0.0, 10.0)),
            explanation: parts.join(" | "),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| StrategyError::Unknown(s.to_string()))
    }
}

fn smart_balance(f: &Factors) -> f64 {
    0.40 * f.urgency + 0.35 * f.importance + 0.15 * f.effort + 0.10 * f.dependency_impact
}

fn fastest_wins(f: &Factors) -> f64 {
    0.20 * f.urgency + 0.20 * f.importance + 0.50 * f.effort + 0.10 * f.dependency_impact
}

fn high_impact(f: &Factors) -> f64 {
    0.20 * f.urgency + 0.60 * f.importance + 0.10 * f.effort + 0.10 * f.dependency_impact
}

fn deadline_driven(f: &Factors) -> f64 {
    0.60 * f.urgency + 0.20 * f.importance + 0.10 * f.effort + 0.10 * f.dependency_impact
}

/// A strategy's verdict for one task
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub value: f64,
    pub explanation: String,
}

/// Normalized inputs to every strategy
#[derive(Debug, Clone, PartialEq)]
pub struct Factors {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependency_impact: f64,
    /// Raw count of in-set tasks blocked by this one
    pub blocks: usize,
}

impl Factors {
    /// Derives factors for a task given `today` and its in-set dependent count
    pub fn for_task(task: &Task, today: NaiveDate, blocks: usize) -> Self {
        Self {
            urgency: urgency(task.due_date, today),
            importance: f64::from(task.importance),
            effort: effort_score(task.estimated_hours),
            dependency_impact: (blocks as f64).min(MAX_DEPENDENCY_IMPACT),
            blocks,
        }
    }

    fn describe(&self, task: &Task) -> Vec<String> {
        let due = match task.due_date {
            Some(date) => format!("due {}", date),
            None => "no due date".to_string(),
        };
        let hours = match task.estimated_hours {
            Some(h) => format!("{}h estimated", h),
            None => "effort unknown".to_string(),
        };

        vec![
            format!("Urgency {:.1} ({})", self.urgency, due),
            format!("Importance {:.1}", self.importance),
            format!("Effort score {:.1} ({})", self.effort, hours),
            format!(
                "Dependency impact {:.1} (blocks {} task(s))",
                self.dependency_impact, self.blocks
            ),
        ]
    }
}

/// Maps an effort estimate to a quick-win score
///
/// Up to 1h scores 10, up to 2h 8, up to 4h 6, up to 8h 3, longer 1.
/// An unknown estimate is neutral.
pub fn effort_score(estimated_hours: Option<f64>) -> f64 {
    match estimated_hours {
        None => UNKNOWN_EFFORT_SCORE,
        Some(h) if h <= 1.0 => 10.0,
        Some(h) if h <= 2.0 => 8.0,
        Some(h) if h <= 4.0 => 6.0,
        Some(h) if h <= 8.0 => 3.0,
        Some(_) => 1.0,
    }
}

/// Rounds to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
