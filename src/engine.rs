//! Analyze and Suggest
//!
//! [`Prioritizer`] is the entry point used by transports. It validates
//! submissions, runs analysis passes and owns the session store through
//! which Analyze hands its task set to later Suggest calls.

use anyhow::Result;
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::{analyze, parse_tasks, rank, Analysis, AnalyzedTask, Strategy, Task};
use crate::storage::{AnalysisSession, SessionStore};

/// Prioritization engine bound to a session store
pub struct Prioritizer<S> {
    store: S,
    suggest_limit: usize,
}

impl<S: SessionStore> Prioritizer<S> {
    /// Creates an engine suggesting the default number of tasks
    pub fn new(store: S) -> Self {
        Self {
            store,
            suggest_limit: rank::DEFAULT_SUGGESTIONS,
        }
    }

    /// Sets how many tasks Suggest returns (at least one)
    pub fn with_suggest_limit(mut self, limit: usize) -> Self {
        self.suggest_limit = limit.max(1);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates raw records, then analyzes them
    ///
    /// Malformed submissions fail with a
    /// [`ValidationError`](crate::domain::ValidationError) and leave the
    /// session untouched.
    pub fn analyze(&self, records: &Value, strategy: Strategy, today: NaiveDate) -> Result<Analysis> {
        let tasks = parse_tasks(records)?;
        self.analyze_tasks(tasks, strategy, today)
    }

    /// Replaces the session with `tasks` and returns their analysis in input order
    pub fn analyze_tasks(
        &self,
        tasks: Vec<Task>,
        strategy: Strategy,
        today: NaiveDate,
    ) -> Result<Analysis> {
        let analysis = analyze(&tasks, strategy, today);

        let session = self
            .store
            .replace(AnalysisSession::new(tasks, strategy, today))?;
        info!(
            tasks = session.len(),
            fingerprint = %session.fingerprint,
            %strategy,
            "session replaced"
        );

        Ok(analysis)
    }

    /// Re-ranks the current session under `strategy` and returns the top tasks
    ///
    /// Returns an empty list when no analysis has run yet.
    pub fn suggest(&self, strategy: Strategy, today: NaiveDate) -> Result<Vec<AnalyzedTask>> {
        let Some(session) = self.store.current()? else {
            debug!("no session yet, nothing to suggest");
            return Ok(Vec::new());
        };

        let analysis = analyze(&session.tasks, strategy, today);
        let shortlist = rank::top(analysis.tasks, self.suggest_limit);
        debug!(
            fingerprint = %session.fingerprint,
            suggested = shortlist.len(),
            %strategy,
            "suggestions ranked"
        );

        Ok(shortlist)
    }

    /// The current session, if any
    pub fn session(&self) -> Result<Option<std::sync::Arc<AnalysisSession>>> {
        self.store.current()
    }
}
