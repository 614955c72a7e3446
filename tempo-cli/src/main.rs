use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, ClientAction, Command, PomodoroAction, ProjectAction, TaskAction};
use crate::config::Config;
use crate::pomodoro::{GnomePomodoro, SessionTimer};
use crate::store::Store;
use crate::tracker::{Action, StartOutcome, StopOutcome, SyncOutcome, Tracker};

mod api;
mod cli;
mod clients;
mod config;
mod context;
mod info;
mod notify;
mod pomodoro;
mod projects;
mod select;
mod store;
mod tasks;
#[cfg(test)]
mod testing;
mod tracker;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_from(normalized_args());
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Session-timer hooks invoke this binary with a single trigger string,
/// sometimes with extra words ("start enable") and sometimes with words
/// clap knows nothing about ("shutdown"). Split compound triggers apart
/// and map unrecognized ones onto start/stop before clap sees them.
fn normalized_args() -> Vec<String> {
    let mut argv: Vec<String> = std::env::args().collect();

    if argv.len() == 2 && argv[1].contains(char::is_whitespace) {
        let words: Vec<String> = argv
            .remove(1)
            .split_whitespace()
            .map(str::to_string)
            .collect();
        argv.extend(words);
    }

    if let Some(first) = argv.get(1) {
        if !first.starts_with('-') {
            let lowered = first.to_ascii_lowercase();
            if cli::is_builtin_command(&lowered) {
                argv[1] = lowered;
            } else {
                tracing::debug!(trigger = %first, "unrecognized trigger word");
                argv.truncate(1);
                argv.push(
                    match Action::classify(&lowered) {
                        Action::Start => "start",
                        Action::Stop => "stop",
                    }
                    .to_string(),
                );
            }
        }
    }
    argv
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let store = Store::default_location()?;
    let mut config = store.load_config()?;
    apply_overrides(&cli, &mut config, &store)?;

    let timer = GnomePomodoro;

    if let Some(Command::Pomodoro { action }) = &cli.command {
        return run_pomodoro(&timer, action);
    }

    let missing = config.missing_required();
    if !missing.is_empty() {
        bail!(
            "Missing required configuration: {}. Pass --{} once to persist it.",
            missing.join(", "),
            missing[0].replace('_', "-")
        );
    }
    let token = config
        .api_token
        .clone()
        .context("API token disappeared from config")?;
    let api = clockify::Client::new(token);
    let tracker = Tracker::new(&api, &timer, &store);

    // `tempo --description "x"` with no command is a description change
    // while possibly mid-session, not an override for a single run
    let description_override = cli.description_override().map(str::to_string);
    let command = match cli.command {
        Some(command) => command,
        None => {
            if let Some(description) = description_override {
                tracker.change_description(&mut config, &description).await?;
                return Ok(ExitCode::SUCCESS);
            }
            Command::Info
        }
    };

    match command {
        Command::Start { .. } | Command::Resume => {
            report_start(tracker.start(&mut config).await?)
        }
        Command::Stop | Command::Pause | Command::Complete => {
            report_stop(tracker.stop(&mut config).await?)
        }
        Command::Skip { .. } => {
            if let Err(e) = timer.skip() {
                tracing::warn!("could not skip session timer: {e}");
            }
            report_stop(tracker.stop(&mut config).await?)
        }
        Command::Info => {
            info::show(&api, &timer, &store, &config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Sync => {
            match tracker.sync(&mut config).await? {
                SyncOutcome::Started(outcome) => return report_start(outcome),
                SyncOutcome::Stopped(outcome) => return report_stop(outcome),
                SyncOutcome::InSync => println!("Already in sync."),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Project { action } => {
            match action.unwrap_or(ProjectAction::Select) {
                ProjectAction::List => projects::list(&api, &config).await?,
                ProjectAction::Select => projects::select(&api, &tracker, &mut config).await?,
                ProjectAction::Set { name } => {
                    projects::set(&api, &tracker, &mut config, &name).await?
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Projects => {
            projects::list(&api, &config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Client { action } => {
            match action.unwrap_or(ClientAction::Select) {
                ClientAction::List => clients::list(&api, &config).await?,
                ClientAction::Select => clients::select(&api, &store, &mut config).await?,
                ClientAction::Set { name } => {
                    clients::set(&api, &store, &mut config, &name).await?
                }
                ClientAction::Clear => clients::clear(&store, &mut config)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Clients => {
            clients::list(&api, &config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Task { action } => {
            match action.unwrap_or(TaskAction::Select { limit: 50 }) {
                TaskAction::List { limit } => tasks::list(&api, &config, limit).await?,
                TaskAction::Select { limit } => {
                    tasks::select(&api, &tracker, &mut config, limit).await?
                }
                TaskAction::Set { name } => {
                    tracker.change_description(&mut config, &name).await?
                }
                TaskAction::Create { name } => {
                    tasks::create(&api, &tracker, &mut config, &name).await?
                }
                TaskAction::Delete { name } => {
                    tasks::delete(&api, &tracker, &mut config, &name).await?
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Tasks => {
            tasks::list(&api, &config, 50).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Switch => {
            tasks::switch(&tracker, &mut config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Pomodoro { .. } => unreachable!("handled before remote setup"),
    }
}

/// CLI overrides are persisted, so passing `--token` once is enough.
fn apply_overrides(cli: &Cli, config: &mut Config, store: &Store) -> Result<()> {
    let mut changed = false;
    if let Some(token) = &cli.token {
        config.api_token = Some(token.clone());
        changed = true;
    }
    if let Some(workspace_id) = &cli.workspace_id {
        config.workspace_id = Some(workspace_id.clone());
        changed = true;
    }
    if let Some(project_id) = &cli.project_id {
        config.project_id = Some(project_id.clone());
        changed = true;
    }
    if cli.command.is_some() {
        if let Some(description) = cli.description_override() {
            config.description = Some(description.to_string());
            changed = true;
        }
    }
    if changed {
        store.save_config(config)?;
    }
    Ok(())
}

fn run_pomodoro(timer: &impl SessionTimer, action: &PomodoroAction) -> Result<ExitCode> {
    match action {
        PomodoroAction::Start => timer.start()?,
        PomodoroAction::Stop => timer.stop()?,
        PomodoroAction::Pause => timer.pause()?,
        PomodoroAction::Resume => timer.resume()?,
        PomodoroAction::Skip => timer.skip()?,
        PomodoroAction::Status => println!("{}", timer.phase()?),
    }
    Ok(ExitCode::SUCCESS)
}

fn report_start(outcome: StartOutcome) -> Result<ExitCode> {
    match outcome {
        StartOutcome::Started { description, .. } => {
            notify::send("Time tracking started", &description);
            println!("Time entry started: {}", description);
            Ok(ExitCode::SUCCESS)
        }
        StartOutcome::AlreadyRunning => {
            println!("A time entry is already running.");
            Ok(ExitCode::SUCCESS)
        }
        StartOutcome::OnBreak(phase) => {
            println!("Session timer is on a {}; not starting.", phase);
            Ok(ExitCode::FAILURE)
        }
        StartOutcome::RecentStop { seconds_ago } => {
            println!(
                "Ignoring resume {}s after a manual stop; run `tempo start` to force.",
                seconds_ago
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

fn report_stop(outcome: StopOutcome) -> Result<ExitCode> {
    match outcome {
        StopOutcome::Stopped { description } => {
            notify::send("Time tracking stopped", &description);
            println!("Time entry stopped: {}", description);
            Ok(ExitCode::SUCCESS)
        }
        StopOutcome::Reconciled => {
            println!("Entry was already gone; local state cleared.");
            Ok(ExitCode::SUCCESS)
        }
        StopOutcome::NoActiveEntry => {
            println!("No active time entry.");
            Ok(ExitCode::FAILURE)
        }
    }
}
