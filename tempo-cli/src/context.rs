use clockify::models::{Task, TimeEntry};
use clockify::ClockifyError;

use crate::api::TimeTracking;
use crate::config::Config;

/// The resolved current project. `name` is `None` when the id points at a
/// project the workspace no longer lists (deleted remotely).
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentProject {
    pub id: String,
    pub name: Option<String>,
}

impl CurrentProject {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unknown project)")
    }
}

/// Remote truth about what is actually running outranks the local
/// preference: an in-progress entry started elsewhere silently becomes
/// "current" here.
pub fn project_id_from(in_progress: Option<&TimeEntry>, config: &Config) -> Option<String> {
    in_progress
        .and_then(|entry| entry.project_id.clone())
        .or_else(|| config.project_id.clone())
}

pub async fn current_project_id(
    api: &impl TimeTracking,
    config: &Config,
    workspace_id: &str,
    user_id: &str,
) -> Result<Option<String>, ClockifyError> {
    let entry = api.in_progress_entry(workspace_id, user_id).await?;
    Ok(project_id_from(entry.as_ref(), config))
}

pub async fn current_project(
    api: &impl TimeTracking,
    config: &Config,
    workspace_id: &str,
    user_id: &str,
) -> Result<Option<CurrentProject>, ClockifyError> {
    let Some(id) = current_project_id(api, config, workspace_id, user_id).await? else {
        return Ok(None);
    };
    let name = api
        .projects(workspace_id)
        .await?
        .into_iter()
        .find(|p| p.id == id)
        .map(|p| p.name);
    Ok(Some(CurrentProject { id, name }))
}

/// Tasks scoped to the resolved current project; `None` when no project
/// could be resolved at all.
pub async fn current_project_tasks(
    api: &impl TimeTracking,
    config: &Config,
    workspace_id: &str,
    user_id: &str,
) -> Result<Option<(CurrentProject, Vec<Task>)>, ClockifyError> {
    let Some(project) = current_project(api, config, workspace_id, user_id).await? else {
        return Ok(None);
    };
    let tasks = api.tasks(workspace_id, &project.id).await?;
    Ok(Some((project, tasks)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{entry, event_log, project, FakeApi};

    fn config_with_project(id: &str) -> Config {
        Config {
            project_id: Some(id.to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn remote_in_progress_project_outranks_configured_one() {
        let config = config_with_project("p1");
        let running = entry("e1", Some("p2"), "elsewhere", true);
        assert_eq!(
            project_id_from(Some(&running), &config),
            Some("p2".to_string())
        );
    }

    #[test]
    fn falls_back_to_configured_project() {
        let config = config_with_project("p1");
        assert_eq!(project_id_from(None, &config), Some("p1".to_string()));

        let running_without_project = entry("e1", None, "misc", true);
        assert_eq!(
            project_id_from(Some(&running_without_project), &config),
            Some("p1".to_string())
        );
    }

    #[test]
    fn no_project_resolves_to_none() {
        assert_eq!(project_id_from(None, &Config::default()), None);
    }

    #[tokio::test]
    async fn deleted_project_reports_unknown_name_instead_of_failing() {
        let log = event_log();
        let mut api = FakeApi::new(log);
        api.projects = vec![project("p1", "Website")];
        let config = config_with_project("p-gone");

        let current = current_project(&api, &config, "w1", "u1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.id, "p-gone");
        assert_eq!(current.name, None);
        assert_eq!(current.display_name(), "(unknown project)");
    }

    #[tokio::test]
    async fn resolves_tasks_for_current_project() {
        let log = event_log();
        let mut api = FakeApi::new(log);
        api.projects = vec![project("p1", "Website")];
        api.tasks = vec![
            clockify::models::Task {
                id: "t1".to_string(),
                name: "Backend".to_string(),
                project_id: "p1".to_string(),
            },
            clockify::models::Task {
                id: "t2".to_string(),
                name: "Other".to_string(),
                project_id: "p2".to_string(),
            },
        ];
        let config = config_with_project("p1");

        let (project, tasks) = current_project_tasks(&api, &config, "w1", "u1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(project.name.as_deref(), Some("Website"));
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "Backend");
    }
}
