use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;

use crate::models::{
    NewTask, NewTimeEntry, Project, StopTimeEntry, Task, TimeEntry, User, Workspace,
    WorkspaceClient,
};
use crate::ClockifyUrl;

/// Typed client for the Clockify REST API. One method per remote resource,
/// no business logic.
pub struct Client {
    token: String,
    http: reqwest::Client,
    base_url: ClockifyUrl,
}

impl Client {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            http: reqwest::Client::new(),
            base_url: ClockifyUrl::from_env(),
        }
    }

    async fn request<B, T>(
        &self,
        method: Method,
        url: impl AsRef<str>,
        body: Option<&B>,
    ) -> Result<T, ClockifyError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut req = self
            .http
            .request(method.clone(), url.as_ref())
            .header("X-Api-Key", &self.token)
            .header("Content-Type", "application/json");
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ClockifyError::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ClockifyError::Http(e.to_string()))?;
        tracing::debug!(%method, url = url.as_ref(), %status, "clockify response");

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClockifyError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ClockifyError::NotFound { body }),
            s if !s.is_success() => Err(ClockifyError::Api {
                status: s.as_u16(),
                body,
            }),
            _ => serde_json::from_str(&body).map_err(|e| {
                ClockifyError::Parse(format!("failed to parse response as JSON: {}", e))
            }),
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: impl AsRef<str>) -> Result<T, ClockifyError> {
        self.request::<(), T>(Method::GET, url, None).await
    }

    /// `GET /user` — the user the API token belongs to.
    pub async fn current_user(&self) -> Result<User, ClockifyError> {
        self.get(self.base_url.append_path("/user")).await
    }

    /// `GET /workspaces` — workspaces visible to the current user.
    pub async fn workspaces(&self) -> Result<Vec<Workspace>, ClockifyError> {
        self.get(self.base_url.append_path("/workspaces")).await
    }

    /// `GET /workspaces/{id}/clients` — clients (customers) on the workspace.
    pub async fn clients(
        &self,
        workspace_id: &str,
    ) -> Result<Vec<WorkspaceClient>, ClockifyError> {
        let url = self
            .base_url
            .append_path(&format!("/workspaces/{}/clients", workspace_id));
        self.get(url).await
    }

    /// `GET /workspaces/{id}/projects`
    pub async fn projects(&self, workspace_id: &str) -> Result<Vec<Project>, ClockifyError> {
        let url = self
            .base_url
            .append_path(&format!("/workspaces/{}/projects", workspace_id));
        self.get(url).await
    }

    /// `GET /workspaces/{id}/projects/{id}/tasks`
    pub async fn tasks(
        &self,
        workspace_id: &str,
        project_id: &str,
    ) -> Result<Vec<Task>, ClockifyError> {
        let url = self.base_url.append_path(&format!(
            "/workspaces/{}/projects/{}/tasks",
            workspace_id, project_id
        ));
        self.get(url).await
    }

    /// The user's in-progress time entry, if any. The service enforces at
    /// most one per user.
    pub async fn in_progress_entry(
        &self,
        workspace_id: &str,
        user_id: &str,
    ) -> Result<Option<TimeEntry>, ClockifyError> {
        let url = self
            .base_url
            .append_path(&format!(
                "/workspaces/{}/user/{}/time-entries",
                workspace_id, user_id
            ))
            .with_query("in-progress", "true");
        let entries: Vec<TimeEntry> = self.get(url).await?;
        Ok(entries.into_iter().find(TimeEntry::in_progress))
    }

    /// Recent time entries, most recent first.
    pub async fn time_entries(
        &self,
        workspace_id: &str,
        user_id: &str,
        page_size: usize,
    ) -> Result<Vec<TimeEntry>, ClockifyError> {
        let url = self
            .base_url
            .append_path(&format!(
                "/workspaces/{}/user/{}/time-entries",
                workspace_id, user_id
            ))
            .with_query("page-size", &page_size.to_string());
        self.get(url).await
    }

    /// `POST /workspaces/{id}/time-entries` — start a new entry.
    pub async fn start_entry(
        &self,
        workspace_id: &str,
        entry: &NewTimeEntry,
    ) -> Result<TimeEntry, ClockifyError> {
        let url = self
            .base_url
            .append_path(&format!("/workspaces/{}/time-entries", workspace_id));
        self.request(Method::POST, url, Some(entry)).await
    }

    /// `PATCH .../user/{id}/time-entries` — set `end` on the in-progress
    /// entry. Returns `ClockifyError::NotFound` when the service has no
    /// in-progress entry for the user.
    pub async fn stop_in_progress(
        &self,
        workspace_id: &str,
        user_id: &str,
        end: OffsetDateTime,
    ) -> Result<TimeEntry, ClockifyError> {
        let url = self.base_url.append_path(&format!(
            "/workspaces/{}/user/{}/time-entries",
            workspace_id, user_id
        ));
        self.request(Method::PATCH, url, Some(&StopTimeEntry { end }))
            .await
    }

    /// `POST .../projects/{id}/tasks` — create a formal task.
    pub async fn create_task(
        &self,
        workspace_id: &str,
        project_id: &str,
        name: &str,
    ) -> Result<Task, ClockifyError> {
        let url = self.base_url.append_path(&format!(
            "/workspaces/{}/projects/{}/tasks",
            workspace_id, project_id
        ));
        self.request(
            Method::POST,
            url,
            Some(&NewTask {
                name: name.to_string(),
            }),
        )
        .await
    }

    /// `DELETE .../projects/{id}/tasks/{id}`
    pub async fn delete_task(
        &self,
        workspace_id: &str,
        project_id: &str,
        task_id: &str,
    ) -> Result<(), ClockifyError> {
        let url = self.base_url.append_path(&format!(
            "/workspaces/{}/projects/{}/tasks/{}",
            workspace_id, project_id, task_id
        ));
        let resp = self
            .http
            .delete(url.as_ref())
            .header("X-Api-Key", &self.token)
            .send()
            .await
            .map_err(|e| ClockifyError::Http(e.to_string()))?;

        let status = resp.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClockifyError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ClockifyError::NotFound {
                body: resp.text().await.unwrap_or_default(),
            }),
            s if !s.is_success() => Err(ClockifyError::Api {
                status: s.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            }),
            _ => Ok(()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ClockifyError {
    #[error("Unauthorized")]
    Unauthorized,
    /// The referenced resource no longer exists. Kept distinct from `Api`
    /// because a not-found on stop is a reconciliation signal, not a failure.
    #[error("NotFound: {body}")]
    NotFound { body: String },
    #[error("ApiError ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("HttpError: {0}")]
    Http(String),
    #[error("ParsingError: {0}")]
    Parse(String),
}

impl ClockifyError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClockifyError::NotFound { .. })
    }
}
