use std::io;

use anyhow::{bail, Context, Result};
use clockify::models::Project;

use crate::api::TimeTracking;
use crate::config::{Config, Selection};
use crate::context;
use crate::pomodoro::SessionTimer;
use crate::select::{self, Picked};
use crate::tracker::Tracker;

fn workspace(config: &Config) -> Result<String> {
    config
        .workspace_id
        .clone()
        .context("No workspace configured; pass --workspace-id once to persist it")
}

/// Projects visible under the configured client filter. No client set
/// means everything is visible.
fn visible_projects(projects: Vec<Project>, client_id: Option<&str>) -> Vec<Project> {
    match client_id {
        Some(client_id) => projects
            .into_iter()
            .filter(|p| p.client_id.as_deref() == Some(client_id))
            .collect(),
        None => projects,
    }
}

async fn filtered_projects(
    api: &impl TimeTracking,
    config: &Config,
    workspace: &str,
) -> Result<Option<Vec<Project>>> {
    let projects = api.projects(workspace).await?;
    if projects.is_empty() {
        println!("No projects in this workspace.");
        return Ok(None);
    }

    let projects = visible_projects(projects, config.client_id.as_deref());
    if projects.is_empty() {
        let client_id = config.client_id.as_deref().unwrap_or_default();
        let name = api
            .clients(workspace)
            .await?
            .into_iter()
            .find(|c| c.id == client_id)
            .map(|c| c.name)
            .unwrap_or_else(|| client_id.to_string());
        println!("No projects found for client: {}", name);
        return Ok(None);
    }
    Ok(Some(projects))
}

pub async fn list(api: &impl TimeTracking, config: &Config) -> Result<()> {
    let workspace = workspace(config)?;
    let user = api.current_user().await?;
    let Some(projects) = filtered_projects(api, config, &workspace).await? else {
        return Ok(());
    };

    let current = context::current_project_id(api, config, &workspace, &user.id).await?;
    println!("Projects:");
    for project in &projects {
        let marker = if current.as_deref() == Some(project.id.as_str()) {
            " (current)"
        } else {
            ""
        };
        println!("  {}{}", project.name, marker);
    }
    Ok(())
}

pub async fn select<A, T>(
    api: &A,
    tracker: &Tracker<'_, A, T>,
    config: &mut Config,
) -> Result<()>
where
    A: TimeTracking,
    T: SessionTimer,
{
    let workspace = workspace(config)?;
    let user = api.current_user().await?;
    let Some(projects) = filtered_projects(api, config, &workspace).await? else {
        return Ok(());
    };
    let names: Vec<String> = projects.iter().map(|p| p.name.clone()).collect();

    let current = context::current_project(api, config, &workspace, &user.id)
        .await?
        .and_then(|p| p.name);

    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout();
    let Some(Picked::Item(index)) = select::select_index(
        &mut stdin,
        &mut stdout,
        &names,
        "Available projects",
        current.as_deref(),
    )?
    else {
        return Ok(());
    };

    apply(tracker, config, &projects[index].id, &projects[index].name).await
}

pub async fn set<A, T>(
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
    let projects = api.projects(&workspace).await?;
    let Some(project) = projects
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
    else {
        bail!("No project named '{}' in this workspace", name);
    };
    let (id, name) = (project.id.clone(), project.name.clone());
    apply(tracker, config, &id, &name).await
}

/// Persist the new project. The formal task binding belongs to the old
/// project and is dropped; the description survives the move.
async fn apply<A, T>(
    tracker: &Tracker<'_, A, T>,
    config: &mut Config,
    project_id: &str,
    project_name: &str,
) -> Result<()>
where
    A: TimeTracking,
    T: SessionTimer,
{
    if config.project_id.as_deref() == Some(project_id) {
        println!("Project already set to: {}", project_name);
        return Ok(());
    }

    let selection = Selection {
        project_id: Some(project_id.to_string()),
        task_id: None,
        task_name: None,
        description: config.description.clone(),
    };
    tracker.change_selection(config, selection, true).await?;
    println!("Project set to: {}", project_name);
    Ok(())
}
