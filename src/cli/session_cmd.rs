//! Session inspection commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::storage::SessionStore;

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Show the current session
    Show,

    /// Discard the current session
    Clear,
}

pub fn run<S: SessionStore>(cmd: SessionCommands, output: &Output, store: &S) -> Result<()> {
    match cmd {
        SessionCommands::Show => show(output, store),
        SessionCommands::Clear => {
            if store.clear()? {
                output.success("Session cleared");
            } else {
                output.success("No session to clear");
            }
            Ok(())
        }
    }
}

fn show<S: SessionStore>(output: &Output, store: &S) -> Result<()> {
    let session = store.current()?;

    if output.is_json() {
        output.data(&serde_json::json!({ "session": session.as_deref() }));
        return Ok(());
    }

    match session {
        None => println!("No session. Run 'taskrank analyze' first."),
        Some(session) => {
            println!("Session {}", session.fingerprint);
            println!("  Tasks:       {}", session.len());
            println!("  Strategy:    {}", session.strategy);
            println!("  Analyzed on: {}", session.analyzed_on);
        }
    }

    Ok(())
}
