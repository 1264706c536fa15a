//! taskrank - prioritize tasks and suggest what to do next

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = taskrank::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
