use std::io;

use anyhow::{bail, Context, Result};

use crate::api::TimeTracking;
use crate::config::{Config, Selection};
use crate::context;
use crate::pomodoro::SessionTimer;
use crate::select::{self, Picked};
use crate::tracker::Tracker;

const NEW_DESCRIPTION_ITEM: &str = "[Enter a new description]";
const NEW_TASK_ITEM: &str = "[Create a new task]";

fn workspace(config: &Config) -> Result<String> {
    config
        .workspace_id
        .clone()
        .context("No workspace configured; pass --workspace-id once to persist it")
}

pub async fn list(api: &impl TimeTracking, config: &Config, limit: usize) -> Result<()> {
    let workspace = workspace(config)?;
    let user = api.current_user().await?;
    let Some((project, tasks)) =
        context::current_project_tasks(api, config, &workspace, &user.id).await?
    else {
        bail!("No current project; run `tempo project` first");
    };

    println!("Project: {}", project.display_name());

    if tasks.is_empty() {
        println!("No tasks in this project.");
    } else {
        println!("Tasks:");
        for task in &tasks {
            let marker = if config.task_id.as_deref() == Some(task.id.as_str()) {
                " (current)"
            } else {
                ""
            };
            println!("  {}{}", task.name, marker);
        }
    }

    let history = api.time_entries(&workspace, &user.id, limit).await?;
    let descriptions = select::description_history(&history, &project.id);
    if !descriptions.is_empty() {
        println!("Recent descriptions:");
        for description in &descriptions {
            let marker = if config.description.as_deref() == Some(description.as_str()) {
                " (current)"
            } else {
                ""
            };
            println!("  {}{}", description, marker);
        }
    }
    Ok(())
}

/// Interactive task/description picker. The menu is formal tasks first,
/// then distinct historical descriptions, then a free-text escape hatch.
pub async fn select<A, T>(
    api: &A,
    tracker: &Tracker<'_, A, T>,
    config: &mut Config,
    limit: usize,
) -> Result<()>
where
    A: TimeTracking,
    T: SessionTimer,
{
    let workspace = workspace(config)?;
    let user = api.current_user().await?;
    let Some((project, tasks)) =
        context::current_project_tasks(api, config, &workspace, &user.id).await?
    else {
        bail!("No current project; run `tempo project` first");
    };

    let history = api.time_entries(&workspace, &user.id, limit).await?;
    let descriptions: Vec<String> = select::description_history(&history, &project.id)
        .into_iter()
        .filter(|d| !tasks.iter().any(|t| &t.name == d))
        .collect();

    // the description row goes last so free text typed at the prompt
    // lands on it
    let mut items: Vec<String> = tasks.iter().map(|t| t.name.clone()).collect();
    items.extend(descriptions);
    items.push(NEW_TASK_ITEM.to_string());
    items.push(NEW_DESCRIPTION_ITEM.to_string());

    let current = config
        .description
        .as_deref()
        .or(config.task_name.as_deref());

    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout();
    let index = match select::select_index(
        &mut stdin,
        &mut stdout,
        &items,
        &format!("Tasks for {}", project.display_name()),
        current,
    )? {
        None => return Ok(()),
        Some(Picked::Text(text)) => {
            let selection = Selection {
                project_id: None,
                task_id: None,
                task_name: None,
                description: Some(text.clone()),
            };
            tracker.change_selection(config, selection, true).await?;
            println!("Task set to: {}", text);
            return Ok(());
        }
        Some(Picked::Item(index)) => index,
    };

    let selection = if index < tasks.len() {
        let task = &tasks[index];
        Selection {
            project_id: None,
            task_id: Some(task.id.clone()),
            task_name: Some(task.name.clone()),
            description: Some(task.name.clone()),
        }
    } else if items[index] == NEW_DESCRIPTION_ITEM {
        let Some(description) =
            select::read_line(&mut stdin, &mut stdout, "New description: ")?
        else {
            println!("No description entered.");
            return Ok(());
        };
        Selection {
            project_id: None,
            task_id: None,
            task_name: None,
            description: Some(description),
        }
    } else if items[index] == NEW_TASK_ITEM {
        let Some(name) = select::read_line(&mut stdin, &mut stdout, "New task name: ")? else {
            println!("No task name entered.");
            return Ok(());
        };
        return create(api, tracker, config, &name).await;
    } else {
        Selection {
            project_id: None,
            task_id: None,
            task_name: None,
            description: Some(items[index].clone()),
        }
    };

    let label = selection.description.clone().unwrap_or_default();
    tracker.change_selection(config, selection, true).await?;
    println!("Task set to: {}", label);
    Ok(())
}

pub async fn create<A, T>(
    api: &A,
    tracker: &Tracker<'_, A, T>,
    config: &mut Config,
    name: &str,
) -> Result<()>
where
    A: TimeTracking,
    T: SessionTimer,
{
    let workspace = workspace(config)?;
    let user = api.current_user().await?;
    let project_id = context::current_project_id(api, config, &workspace, &user.id)
        .await?
        .context("No current project; run `tempo project` first")?;

    let task = api.create_task(&workspace, &project_id, name).await?;
    println!("Task created: {}", task.name);

    let selection = Selection {
        project_id: None,
        task_id: Some(task.id),
        task_name: Some(task.name.clone()),
        description: Some(task.name),
    };
    tracker.change_selection(config, selection, true).await?;
    Ok(())
}

pub async fn delete<A, T>(
    api: &A,
    tracker: &Tracker<'_, A, T>,
    config: &mut Config,
    name: &str,
) -> Result<()>
where
    A: TimeTracking,
    T: SessionTimer,
{
    let workspace = workspace(config)?;
    let user = api.current_user().await?;
    let Some((project, tasks)) =
        context::current_project_tasks(api, config, &workspace, &user.id).await?
    else {
        bail!("No current project; run `tempo project` first");
    };
    let Some(task) = tasks.iter().find(|t| t.name.eq_ignore_ascii_case(name)) else {
        bail!("No task named '{}' in {}", name, project.display_name());
    };

    api.delete_task(&workspace, &project.id, &task.id).await?;
    println!("Task deleted: {}", task.name);

    // deleting the selected task leaves its name behind as a plain
    // description, so tracking can continue uninterrupted
    if config.task_id.as_deref() == Some(task.id.as_str()) {
        let selection = Selection {
            project_id: None,
            task_id: None,
            task_name: None,
            description: config.description.clone().or(config.task_name.clone()),
        };
        tracker.change_selection(config, selection, false).await?;
    }
    Ok(())
}

/// Jump back to the previously active selection, like `cd -`.
pub async fn switch<A, T>(
    tracker: &Tracker<'_, A, T>,
    config: &mut Config,
) -> Result<()>
where
    A: TimeTracking,
    T: SessionTimer,
{
    let Some(previous) = config.previous.clone() else {
        bail!("No previous task to switch to");
    };
    let label = previous
        .description
        .clone()
        .or_else(|| previous.task_name.clone())
        .unwrap_or_default();
    tracker.change_selection(config, previous, true).await?;
    println!("Switched to: {}", label);
    Ok(())
}
