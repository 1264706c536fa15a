//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `analyze [FILE]` | Score a task list and make it the current session |
//! | `suggest` | Top-ranked tasks of the current session |
//! | `cycles [FILE]` | Dependency cycles and external references |
//! | `strategies` | Available scoring strategies |
//! | `session show`, `session clear` | Inspect or discard the session |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug logging on stderr:
//! ```bash
//! taskrank --verbose suggest --strategy deadline_driven
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod input;
mod analyze;
mod cycles;
mod session_cmd;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
