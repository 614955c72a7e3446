use anyhow::{Context, Result};
use time::OffsetDateTime;

use crate::api::TimeTracking;
use crate::config::Config;
use crate::context;
use crate::pomodoro::SessionTimer;
use crate::store::Store;

/// Print the current tracking status: who we are, what is selected, what
/// the remote service says is running, and what the session timer is doing.
pub async fn show(
    api: &impl TimeTracking,
    timer: &impl SessionTimer,
    store: &Store,
    config: &Config,
) -> Result<()> {
    let workspace_id = config
        .workspace_id
        .clone()
        .context("No workspace configured; pass --workspace-id once to persist it")?;
    let user = api.current_user().await?;
    let workspace_name = api
        .workspaces()
        .await?
        .into_iter()
        .find(|w| w.id == workspace_id)
        .map(|w| w.name)
        .unwrap_or_else(|| workspace_id.clone());

    println!("User: {}", user.name.as_deref().unwrap_or(&user.id));
    println!("Workspace: {}", workspace_name);

    match context::current_project(api, config, &workspace_id, &user.id).await? {
        Some(project) => println!("Project: {}", project.display_name()),
        None => println!("Project: (none)"),
    }

    match (&config.task_name, &config.description) {
        (Some(task), Some(description)) if task != description => {
            println!("Task: {} ({})", task, description)
        }
        (Some(task), _) => println!("Task: {}", task),
        (None, Some(description)) => println!("Task: {}", description),
        (None, None) => println!("Task: (none)"),
    }

    match api.in_progress_entry(&workspace_id, &user.id).await? {
        Some(entry) => {
            let elapsed = OffsetDateTime::now_utc() - entry.time_interval.start;
            let total = elapsed.whole_seconds().max(0);
            println!(
                "Tracking: {} (running {:02}:{:02}:{:02})",
                entry.description,
                total / 3600,
                (total % 3600) / 60,
                total % 60
            );
        }
        None => {
            println!("Tracking: stopped");
            // flag local state pointing at an entry that no longer runs
            if let Some(stale) = store.load_run_state()? {
                println!("Warning: stale run state for entry {}", stale);
            }
        }
    }

    match timer.phase() {
        Ok(phase) => println!("Session timer: {}", phase),
        Err(_) => println!("Session timer: unavailable"),
    }
    Ok(())
}
