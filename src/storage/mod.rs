//! # Storage Layer
//!
//! Session persistence and configuration.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Session | JSON | `<data dir>/taskrank/session.json` (or `--session`) |
//! | Config | TOML | `<config dir>/taskrank/config.toml`, `./.taskrank.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`MemorySessionStore`] swaps whole `Arc` snapshots under a lock
//! - [`FileSessionStore`] serializes writers with `fs2` file locks
//! - All file writes are atomic (temp file + rename)

mod config;
mod session;

pub use config::{Config, ConfigError, OutputFormat, LOCAL_CONFIG_FILE};
pub use session::{AnalysisSession, FileSessionStore, MemorySessionStore, SessionStore};
