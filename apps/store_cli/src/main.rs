use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::{Context, Result};
use app_store::{selectors, AppStore, Step};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod replay;

use config::{load_settings, DEFAULT_CONFIG_PATH};
use replay::replay_script;

#[derive(Parser, Debug)]
#[command(name = "gitted-store", about = "Inspect and replay gitted UI state")]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the initial snapshot.
    Snapshot,
    /// List the flow steps in order.
    Steps,
    /// Apply a JSON-lines action script to a fresh store and print the result.
    Replay { script: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli.config)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let store = AppStore::new();

    match cli.command {
        Command::Snapshot => {
            println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
        }
        Command::Steps => {
            for step in Step::ALL {
                println!("{}. {step}", step.position() + 1);
            }
        }
        Command::Replay { script } => {
            if settings.print_changes {
                store.subscribe(|state| match serde_json::to_string(state) {
                    Ok(line) => println!("{line}"),
                    Err(err) => tracing::error!(error = %err, "failed to encode snapshot"),
                });
            } else {
                store.subscribe(|state| {
                    info!(
                        step = %state.current_step,
                        status = %state.processing_status,
                        selected = state.selected_repos.len(),
                        "state changed"
                    )
                });
            }

            let file = File::open(&script)
                .with_context(|| format!("failed to open script '{}'", script.display()))?;
            let summary =
                replay_script(&store, BufReader::new(file), settings.wrapped_slide_count)?;

            let state = store.snapshot();
            let (position, total) = selectors::step_progress(&state);
            info!(
                applied = summary.applied,
                skipped = summary.skipped,
                step = position,
                steps = total,
                has_selection = selectors::has_selection(&state),
                "replay finished"
            );
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
    }

    Ok(())
}
