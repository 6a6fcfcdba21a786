//! Sprint board CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: layered defaults, `.sprintboard/config.toml`,
//!    and `SPRINTBOARD_*` environment variables (see [`config`]).
//! 2. **Wire observability**: `tracing-subscriber` with a text or JSON layer
//!    on stderr, plus an OTLP exporter when one is configured (see
//!    [`telemetry`]).
//! 3. **Construct infrastructure**: build a [`GithubProjectBoard`] and inject
//!    it into [`SprintTracker`].
//! 4. **Run one command** and print its result to stdout as a single JSON
//!    document.

mod config;
mod telemetry;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use board::{state, ContentId, ProjectName, SprintTracker, BACKLOG};
use clap::{Parser, Subcommand};
use github::GithubProjectBoard;
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::telemetry::Telemetry;

#[derive(Debug, Parser)]
#[command(name = "sprintboard", version, about = "Kanban state for GitHub Projects V2 boards")]
struct Cli {
    /// Config file to use instead of `.sprintboard/config.toml`.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Board title. Overrides `project` from the configuration.
    #[arg(short, long, global = true)]
    project: Option<String>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report the sprint state and every predicate from one board read.
    State,

    /// Show the first issue holding a status.
    Top { status: String },

    /// Move the first issue of one status to another.
    Move { from: String, to: String },

    /// Add an existing issue to the board by its node id.
    Add {
        content_id: String,

        #[arg(long, default_value = BACKLOG)]
        status: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let telemetry = Telemetry::init(cli.json_logs)?;
    let result = execute(cli).await;
    telemetry.shutdown();

    let output = result?;
    println!("{output}");
    Ok(())
}

async fn execute(cli: Cli) -> anyhow::Result<Value> {
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let project = cli
        .project
        .or(config.project)
        .and_then(ProjectName::new)
        .context("no project given: pass --project or set `project` in the configuration")?;

    let board = GithubProjectBoard::from_config(&config.github)
        .context("failed to set up the GitHub client")?;
    let tracker = SprintTracker::new(board);
    tracing::debug!(project = %project, "board client ready");

    let output = match cli.command {
        Command::State => {
            let (_, snapshot) = tracker.load(&project).await?;
            json!({
                "project": project,
                "state": state::derive_state(&snapshot),
                "empty": state::is_empty(&snapshot),
                "blocked": state::is_blocked(&snapshot),
                "in_progress": state::is_in_progress(&snapshot),
                "active": state::active_count(&snapshot),
                "items": snapshot.len(),
                "captured_at": snapshot.captured_at,
            })
        }
        Command::Top { status } => {
            let top = tracker.top_item(&project, &status).await?;
            serde_json::to_value(top)?
        }
        Command::Move { from, to } => {
            let moved = tracker.move_top(&project, &from, &to).await?;
            serde_json::to_value(moved)?
        }
        Command::Add { content_id, status } => {
            let content_id = ContentId::new(content_id).context("content id must not be empty")?;
            let item_id = tracker.add_issue(&project, &content_id, &status).await?;
            json!({ "item_id": item_id, "status": status })
        }
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn move_takes_source_and_target() {
        let cli = Cli::try_parse_from([
            "sprintboard",
            "-p",
            "Release 1",
            "move",
            "Ready",
            "In Progress",
        ])
        .unwrap();

        assert_eq!(cli.project.as_deref(), Some("Release 1"));
        match cli.command {
            Command::Move { from, to } => {
                assert_eq!(from, "Ready");
                assert_eq!(to, "In Progress");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn add_defaults_to_backlog() {
        let cli = Cli::try_parse_from(["sprintboard", "add", "I_kwDOabc"]).unwrap();

        match cli.command {
            Command::Add { content_id, status } => {
                assert_eq!(content_id, "I_kwDOabc");
                assert_eq!(status, "Backlog");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "sprintboard",
            "state",
            "--json-logs",
            "--config",
            "ci.toml",
        ])
        .unwrap();

        assert!(cli.json_logs);
        assert_eq!(cli.config, Some(PathBuf::from("ci.toml")));
        assert!(matches!(cli.command, Command::State));
    }

    #[test]
    fn top_requires_a_status() {
        assert!(Cli::try_parse_from(["sprintboard", "top"]).is_err());
    }
}
