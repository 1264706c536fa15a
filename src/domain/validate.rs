//! Structural validation of submitted task records
//!
//! Records arrive as loosely typed JSON. Every violation across the whole
//! submission is collected and reported with its record index and field, and
//! nothing is analyzed unless the submission is clean.
//!
//! Graph conditions (dangling dependencies, self-dependencies, cycles) are not
//! validation failures.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;

use super::id::TaskId;
use super::task::{Task, MAX_IMPORTANCE, MIN_IMPORTANCE};

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Expected a JSON array of tasks, got {0}")]
    NotAnArray(&'static str),

    #[error("Validation failed: {}", join_issues(.0))]
    Invalid(Vec<FieldIssue>),
}

impl ValidationError {
    /// The individual violations, if any
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            ValidationError::NotAnArray(_) => &[],
            ValidationError::Invalid(issues) => issues,
        }
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// One violated constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Position of the record in the submitted array
    pub index: usize,
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tasks[{}].{}: {}", self.index, self.field, self.message)
    }
}

/// Parses and validates a submission into tasks, preserving input order
pub fn parse_tasks(value: &Value) -> Result<Vec<Task>, ValidationError> {
    let records = value
        .as_array()
        .ok_or_else(|| ValidationError::NotAnArray(kind(value)))?;

    let mut issues = Vec::new();
    let mut tasks = Vec::with_capacity(records.len());
    let mut seen: HashMap<TaskId, usize> = HashMap::new();

    for (index, record) in records.iter().enumerate() {
        let mut check = Checker {
            index,
            issues: &mut issues,
        };

        let Some(fields) = record.as_object() else {
            check.fail::<()>("record", format!("expected an object, got {}", kind(record)));
            continue;
        };

        let id = check.id(fields);
        if let Some(id) = &id {
            if let Some(first) = seen.get(id) {
                check.fail::<()>("id", format!("duplicate id '{}' (first used by tasks[{}])", id, first));
            } else {
                seen.insert(id.clone(), index);
            }
        }

        let title = check.title(fields);
        let due_date = check.due_date(fields);
        let estimated_hours = check.estimated_hours(fields);
        let importance = check.importance(fields);
        let dependencies = check.dependencies(fields);

        if let (Some(id), Some(title), Some(due_date), Some(estimated_hours), Some(importance), Some(dependencies)) =
            (id, title, due_date, estimated_hours, importance, dependencies)
        {
            tasks.push(Task {
                id,
                title,
                due_date,
                estimated_hours,
                importance,
                dependencies,
            });
        }
    }

    if issues.is_empty() {
        Ok(tasks)
    } else {
        Err(ValidationError::Invalid(issues))
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Field checks for one record. Each returns `None` after recording an issue.
struct Checker<'a> {
    index: usize,
    issues: &'a mut Vec<FieldIssue>,
}

impl Checker<'_> {
    fn fail<T>(&mut self, field: &'static str, message: impl Into<String>) -> Option<T> {
        self.issues.push(FieldIssue {
            index: self.index,
            field,
            message: message.into(),
        });
        None
    }

    /// Absent and `null` both mean "not provided"
    fn optional<'v>(fields: &'v Map<String, Value>, field: &str) -> Option<&'v Value> {
        fields.get(field).filter(|v| !v.is_null())
    }

    fn required_string(&mut self, fields: &Map<String, Value>, field: &'static str) -> Option<String> {
        match Self::optional(fields, field) {
            None => self.fail(field, "is required"),
            Some(Value::String(s)) if s.trim().is_empty() => self.fail(field, "must not be empty"),
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => self.fail(field, format!("must be a string, got {}", kind(other))),
        }
    }

    fn id(&mut self, fields: &Map<String, Value>) -> Option<TaskId> {
        let raw = self.required_string(fields, "id")?;
        TaskId::new(raw).ok().or_else(|| self.fail("id", "must not be empty"))
    }

    fn title(&mut self, fields: &Map<String, Value>) -> Option<String> {
        self.required_string(fields, "title")
    }

    fn due_date(&mut self, fields: &Map<String, Value>) -> Option<Option<NaiveDate>> {
        match Self::optional(fields, "due_date") {
            None => Some(None),
            Some(Value::String(s)) => match s.parse::<NaiveDate>() {
                Ok(date) => Some(Some(date)),
                Err(_) => self.fail("due_date", format!("'{}' is not a calendar date (YYYY-MM-DD)", s)),
            },
            Some(other) => self.fail(
                "due_date",
                format!("must be a date string (YYYY-MM-DD), got {}", kind(other)),
            ),
        }
    }

    fn estimated_hours(&mut self, fields: &Map<String, Value>) -> Option<Option<f64>> {
        match Self::optional(fields, "estimated_hours") {
            None => Some(None),
            Some(Value::Number(n)) => match n.as_f64() {
                Some(h) if h.is_finite() && h >= 0.0 => Some(Some(h)),
                _ => self.fail("estimated_hours", format!("must be a non-negative number, got {}", n)),
            },
            Some(other) => self.fail(
                "estimated_hours",
                format!("must be a non-negative number, got {}", kind(other)),
            ),
        }
    }

    fn importance(&mut self, fields: &Map<String, Value>) -> Option<u8> {
        let range = MIN_IMPORTANCE..=MAX_IMPORTANCE;
        match Self::optional(fields, "importance") {
            None => self.fail("importance", "is required"),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(i) if i >= i64::from(*range.start()) && i <= i64::from(*range.end()) => {
                    u8::try_from(i).ok()
                }
                Some(i) => self.fail(
                    "importance",
                    format!("must be between {} and {}, got {}", range.start(), range.end(), i),
                ),
                None => self.fail("importance", format!("must be an integer, got {}", n)),
            },
            Some(other) => self.fail("importance", format!("must be an integer, got {}", kind(other))),
        }
    }

    fn dependencies(&mut self, fields: &Map<String, Value>) -> Option<BTreeSet<TaskId>> {
        let items = match Self::optional(fields, "dependencies") {
            None => return Some(BTreeSet::new()),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return self.fail(
                    "dependencies",
                    format!("must be a list of task ids, got {}", kind(other)),
                )
            }
        };

        let mut deps = BTreeSet::new();
        let mut ok = true;
        for (pos, item) in items.iter().enumerate() {
            match item.as_str().map(TaskId::new) {
                Some(Ok(id)) => {
                    deps.insert(id);
                }
                Some(Err(_)) => {
                    ok = false;
                    self.fail::<()>("dependencies", format!("entry {} must not be empty", pos));
                }
                None => {
                    ok = false;
                    self.fail::<()>(
                        "dependencies",
                        format!("entry {} must be a task id string, got {}", pos, kind(item)),
                    );
                }
            }
        }

        ok.then_some(deps)
    }
}
