//! Task identifiers
//!
//! Task IDs are caller-supplied strings. The only structural rule is that an
//! ID is non-empty once surrounding whitespace is ignored; uniqueness is a
//! property of a submitted set and is checked during validation.
//!
//! IDs order lexically, which the ranker relies on for its final tie-break.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid task ID: must be a non-empty string")]
    Empty,
}

/// Identifier of a task within a submitted set
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    /// Creates a task ID, rejecting blank strings
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self(id))
    }

    /// Returns the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl FromStr for TaskId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TaskId {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl Borrow<str> for TaskId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_id_rejected() {
        assert_eq!(TaskId::new(""), Err(IdError::Empty));
        assert_eq!(TaskId::new("   "), Err(IdError::Empty));
    }

    #[test]
    fn parse_and_display() {
        let id: TaskId = "task-1".parse().unwrap();
        assert_eq!(id.as_str(), "task-1");
        assert_eq!(id.to_string(), "task-1");
    }

    #[test]
    fn lexical_ordering() {
        let mut ids: Vec<TaskId> = ["b", "a10", "a2"]
            .into_iter()
            .map(|s| TaskId::new(s).unwrap())
            .collect();
        ids.sort();

        let sorted: Vec<_> = ids.iter().map(TaskId::as_str).collect();
        assert_eq!(sorted, vec!["a10", "a2", "b"]);
    }

    #[test]
    fn serde_roundtrip_rejects_blank() {
        let id: TaskId = serde_json::from_str("\"A\"").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"A\"");

        let bad: Result<TaskId, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }
}
