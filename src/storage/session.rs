//! Analysis session storage
//!
//! A session is the task set submitted by the most recent analysis, kept so
//! that later suggestions can re-rank it. Sessions are immutable snapshots:
//! a store only ever swaps one whole snapshot for another, so readers see
//! either the old session or the new one and never a mix of both.
//!
//! Two stores are provided:
//! - [`MemorySessionStore`] for in-process use (one snapshot behind a lock)
//! - [`FileSessionStore`] for the CLI, which must carry the session between
//!   invocations (JSON file, replaced by atomic rename)

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::domain::{Strategy, Task};

/// The current task set and how it was last analyzed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSession {
    /// Tasks in submission order
    pub tasks: Vec<Task>,

    /// Strategy used by the analysis that created the session
    pub strategy: Strategy,

    /// Date the analysis treated as today
    pub analyzed_on: NaiveDate,

    /// Digest of the task set, identifying this generation
    pub fingerprint: String,
}

impl AnalysisSession {
    pub fn new(tasks: Vec<Task>, strategy: Strategy, analyzed_on: NaiveDate) -> Self {
        let fingerprint = fingerprint(&tasks);
        Self {
            tasks,
            strategy,
            analyzed_on,
            fingerprint,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Generates a 12-character digest of a task set
///
/// Covers every submitted field in order. Dependencies are a sorted set, so
/// their submission order does not change the digest.
fn fingerprint(tasks: &[Task]) -> String {
    let mut hasher = blake3::Hasher::new();
    for task in tasks {
        let due = task.due_date.map(|d| d.to_string()).unwrap_or_default();
        let hours = task
            .estimated_hours
            .map(|h| h.to_bits().to_string())
            .unwrap_or_default();
        let deps: Vec<&str> = task.dependencies.iter().map(|d| d.as_str()).collect();

        let line = format!(
            "{}\0{}\0{}\0{}\0{}\0{}\n",
            task.id,
            task.title,
            due,
            hours,
            task.importance,
            deps.join("\0")
        );
        hasher.update(line.as_bytes());
    }
    let hex = hasher.finalize().to_hex();
    hex[..12].to_string()
}

/// Holder of the current session
pub trait SessionStore: Send + Sync {
    /// Returns the current session, if an analysis has run
    fn current(&self) -> Result<Option<Arc<AnalysisSession>>>;

    /// Replaces the current session wholesale
    fn replace(&self, session: AnalysisSession) -> Result<Arc<AnalysisSession>>;

    /// Drops the current session; returns false if there was none
    fn clear(&self) -> Result<bool>;
}

/// In-process store: one `Arc` snapshot swapped under a lock
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    current: RwLock<Option<Arc<AnalysisSession>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn current(&self) -> Result<Option<Arc<AnalysisSession>>> {
        let guard = self
            .current
            .read()
            .map_err(|_| anyhow!("Session lock poisoned"))?;
        Ok(guard.clone())
    }

    fn replace(&self, session: AnalysisSession) -> Result<Arc<AnalysisSession>> {
        let session = Arc::new(session);
        let mut guard = self
            .current
            .write()
            .map_err(|_| anyhow!("Session lock poisoned"))?;
        *guard = Some(Arc::clone(&session));
        Ok(session)
    }

    fn clear(&self) -> Result<bool> {
        let mut guard = self
            .current
            .write()
            .map_err(|_| anyhow!("Session lock poisoned"))?;
        Ok(guard.take().is_some())
    }
}

/// File-backed store for sessions that outlive the process
///
/// Writers hold an exclusive lock on a sibling `.lock` file while writing a
/// temp file and renaming it over the session file; readers hold a shared
/// lock. Concurrent writers are serialized and the last one wins.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the session file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
        }
        Ok(())
    }

    fn open_lock(&self) -> Result<File> {
        self.ensure_parent()?;
        let lock_path = self.lock_path();
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open session lock: {}", lock_path.display()))
    }
}

impl SessionStore for FileSessionStore {
    fn current(&self) -> Result<Option<Arc<AnalysisSession>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let lock = self.open_lock()?;
        lock.lock_shared()
            .context("Failed to acquire read lock on session")?;

        let mut content = String::new();
        File::open(&self.path)
            .and_then(|mut file| file.read_to_string(&mut content))
            .with_context(|| format!("Failed to read session: {}", self.path.display()))?;

        let session: AnalysisSession = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session: {}", self.path.display()))?;

        // Lock is released when the lock file is dropped
        Ok(Some(Arc::new(session)))
    }

    fn replace(&self, session: AnalysisSession) -> Result<Arc<AnalysisSession>> {
        let lock = self.open_lock()?;
        lock.lock_exclusive()
            .context("Failed to acquire write lock on session")?;

        let temp_path = self.temp_path();
        {
            let file = File::create(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &session)
                .context("Failed to serialize session")?;
            writer.flush().context("Failed to flush session")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(Arc::new(session))
    }

    fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }

        let lock = self.open_lock()?;
        lock.lock_exclusive()
            .context("Failed to acquire write lock on session")?;

        fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove session: {}", self.path.display()))?;
        Ok(true)
    }
}
