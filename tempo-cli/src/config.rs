use serde::{Deserialize, Serialize};

/// Durable configuration. Mutated only by explicit selection or `set`
/// commands and by CLI overrides; the trigger dispatcher never writes the
/// selection fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    /// Narrows project listings and pickers to one client (customer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unix seconds of the last successful stop. Used to suppress spurious
    /// resume triggers fired right after a manual stop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_stop_time: Option<i64>,
    /// Selection restored by `tempo switch`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<Selection>,
}

/// A project/task/description snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.task_id.is_none() && self.task_name.is_none() && self.description.is_none()
    }
}

impl Config {
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_token.is_none() {
            missing.push("token");
        }
        if self.workspace_id.is_none() {
            missing.push("workspace_id");
        }
        missing
    }

    pub fn selection(&self) -> Selection {
        Selection {
            project_id: self.project_id.clone(),
            task_id: self.task_id.clone(),
            task_name: self.task_name.clone(),
            description: self.description.clone(),
        }
    }

    pub fn apply_selection(&mut self, selection: Selection) {
        if selection.project_id.is_some() {
            self.project_id = selection.project_id;
        }
        self.task_id = selection.task_id;
        self.task_name = selection.task_name;
        self.description = selection.description;
    }

    /// Snapshot the current selection as the `switch` target, unless there
    /// is nothing worth remembering.
    pub fn remember_previous(&mut self) {
        let current = self.selection();
        if !current.is_empty() {
            self.previous = Some(current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_selection_keeps_project_when_snapshot_has_none() {
        let mut config = Config {
            project_id: Some("p1".to_string()),
            description: Some("old".to_string()),
            ..Config::default()
        };
        config.apply_selection(Selection {
            description: Some("new".to_string()),
            ..Selection::default()
        });
        assert_eq!(config.project_id.as_deref(), Some("p1"));
        assert_eq!(config.description.as_deref(), Some("new"));
        assert!(config.task_id.is_none());
    }

    #[test]
    fn remember_previous_skips_empty_selection() {
        let mut config = Config::default();
        config.remember_previous();
        assert!(config.previous.is_none());

        config.description = Some("deep work".to_string());
        config.remember_previous();
        assert_eq!(
            config.previous.as_ref().unwrap().description.as_deref(),
            Some("deep work")
        );
    }
}
