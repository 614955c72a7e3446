use serde::{Deserialize, Serialize};

/// A formal task belonging to a project.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub project_id: String,
}

/// Payload for `POST .../projects/{id}/tasks`.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub name: String,
}
