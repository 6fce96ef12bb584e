// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! semlock - counting semaphore over a shared lock file

mod commands;
mod error;
mod output;
mod settings;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{LockArgs, Operation};
use error::SemlockError;
use output::OutputFormat;
use settings::FileSettings;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "semlock",
    version,
    about = "Semlock - limit how many CI runs use a resource at once"
)]
struct Cli {
    /// TOML file with [semaphore] and [store] settings
    #[arg(long, global = true, env = "SEMLOCK_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log debug detail (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wait for a free slot and claim it
    Acquire(LockArgs),
    /// Give up this run's slot
    Release(LockArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let file = FileSettings::load(cli.config.as_deref())?;
    let (operation, args) = match cli.command {
        Commands::Acquire(args) => (Operation::Acquire, args),
        Commands::Release(args) => (Operation::Release, args),
    };

    let resolved = args.resolve(file, |name| std::env::var(name).ok())?;
    commands::execute(operation, resolved, cli.format).await
}

fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .init();
}

/// Print the error for humans, and for the Actions runner when inside one
fn report(err: &anyhow::Error) {
    let summary = match err.downcast_ref::<SemlockError>() {
        Some(error) => {
            eprint!("{}", error);
            error.message.clone()
        }
        None => {
            eprintln!("error: {:#}", err);
            format!("{:#}", err)
        }
    };

    if std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true") {
        println!("::error::{}", escape_workflow_data(&summary));
    }
}

/// Workflow commands end at a newline; `%` escapes must go first
fn escape_workflow_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
