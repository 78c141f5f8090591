//! Command-line front end for the lanes kanban workflow.
//!
//! ```text
//! lanes project add "Home" --color '#7aa2f7'
//! lanes task add <project-id> "Fix the gate" --priority high
//! lanes task next <task-id>
//! lanes board <project-id>
//! ```
//!
//! Data lives in a `SQLite` file. Its location comes from `--database`, the
//! config file, or the platform data directory, in that order. Pass `--json`
//! for machine-readable output.

mod cli;
mod output;

#[cfg(test)]
mod tests;

use clap::Parser;
use cli::{Cli, CliError};
use std::error::Error as _;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();
    match cli::run(cli, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err).ok();
            ExitCode::FAILURE
        }
    }
}

/// Installs a stderr subscriber. Tracing is opt-in via `RUST_LOG`.
fn init_tracing() {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return None;
            }
            EnvFilter::try_new(trimmed).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn report(err: &CliError) -> io::Result<()> {
    let mut stderr = io::stderr().lock();
    writeln!(stderr, "lanes: {err}")?;
    let mut source = err.source();
    while let Some(cause) = source {
        writeln!(stderr, "  caused by: {cause}")?;
        source = cause.source();
    }
    Ok(())
}
