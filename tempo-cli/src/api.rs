use async_trait::async_trait;
use clockify::models::{
    NewTimeEntry, Project, Task, TimeEntry, User, Workspace, WorkspaceClient,
};
use clockify::{Client, ClockifyError};
use time::OffsetDateTime;

/// Seam over the remote time-tracking service, so the dispatcher and
/// resolver can be exercised against a fake in tests.
#[async_trait]
pub trait TimeTracking: Send + Sync {
    async fn current_user(&self) -> Result<User, ClockifyError>;
    async fn workspaces(&self) -> Result<Vec<Workspace>, ClockifyError>;
    async fn clients(&self, workspace_id: &str) -> Result<Vec<WorkspaceClient>, ClockifyError>;
    async fn projects(&self, workspace_id: &str) -> Result<Vec<Project>, ClockifyError>;
    async fn tasks(&self, workspace_id: &str, project_id: &str)
        -> Result<Vec<Task>, ClockifyError>;
    async fn in_progress_entry(
        &self,
        workspace_id: &str,
        user_id: &str,
    ) -> Result<Option<TimeEntry>, ClockifyError>;
    async fn time_entries(
        &self,
        workspace_id: &str,
        user_id: &str,
        page_size: usize,
    ) -> Result<Vec<TimeEntry>, ClockifyError>;
    async fn start_entry(
        &self,
        workspace_id: &str,
        entry: &NewTimeEntry,
    ) -> Result<TimeEntry, ClockifyError>;
    async fn stop_in_progress(
        &self,
        workspace_id: &str,
        user_id: &str,
        end: OffsetDateTime,
    ) -> Result<TimeEntry, ClockifyError>;
    async fn create_task(
        &self,
        workspace_id: &str,
        project_id: &str,
        name: &str,
    ) -> Result<Task, ClockifyError>;
    async fn delete_task(
        &self,
        workspace_id: &str,
        project_id: &str,
        task_id: &str,
    ) -> Result<(), ClockifyError>;
}

#[async_trait]
impl TimeTracking for Client {
    async fn current_user(&self) -> Result<User, ClockifyError> {
        Client::current_user(self).await
    }

    async fn workspaces(&self) -> Result<Vec<Workspace>, ClockifyError> {
        Client::workspaces(self).await
    }

    async fn clients(&self, workspace_id: &str) -> Result<Vec<WorkspaceClient>, ClockifyError> {
        Client::clients(self, workspace_id).await
    }

    async fn projects(&self, workspace_id: &str) -> Result<Vec<Project>, ClockifyError> {
        Client::projects(self, workspace_id).await
    }

    async fn tasks(
        &self,
        workspace_id: &str,
        project_id: &str,
    ) -> Result<Vec<Task>, ClockifyError> {
        Client::tasks(self, workspace_id, project_id).await
    }

    async fn in_progress_entry(
        &self,
        workspace_id: &str,
        user_id: &str,
    ) -> Result<Option<TimeEntry>, ClockifyError> {
        Client::in_progress_entry(self, workspace_id, user_id).await
    }

    async fn time_entries(
        &self,
        workspace_id: &str,
        user_id: &str,
        page_size: usize,
    ) -> Result<Vec<TimeEntry>, ClockifyError> {
        Client::time_entries(self, workspace_id, user_id, page_size).await
    }

    async fn start_entry(
        &self,
        workspace_id: &str,
        entry: &NewTimeEntry,
    ) -> Result<TimeEntry, ClockifyError> {
        Client::start_entry(self, workspace_id, entry).await
    }

    async fn stop_in_progress(
        &self,
        workspace_id: &str,
        user_id: &str,
        end: OffsetDateTime,
    ) -> Result<TimeEntry, ClockifyError> {
        Client::stop_in_progress(self, workspace_id, user_id, end).await
    }

    async fn create_task(
        &self,
        workspace_id: &str,
        project_id: &str,
        name: &str,
    ) -> Result<Task, ClockifyError> {
        Client::create_task(self, workspace_id, project_id, name).await
    }

    async fn delete_task(
        &self,
        workspace_id: &str,
        project_id: &str,
        task_id: &str,
    ) -> Result<(), ClockifyError> {
        Client::delete_task(self, workspace_id, project_id, task_id).await
    }
}
