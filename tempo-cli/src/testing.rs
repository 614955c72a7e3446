use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clockify::models::{
    NewTimeEntry, Project, Task, TimeEntry, TimeInterval, User, Workspace, WorkspaceClient,
};
use clockify::ClockifyError;
use time::macros::datetime;
use time::OffsetDateTime;

use crate::api::TimeTracking;
use crate::pomodoro::{Phase, PomodoroError, SessionTimer};

/// Shared event log so tests can assert the relative order of remote calls
/// and session-timer commands.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

pub fn project(id: &str, name: &str) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        client_id: None,
    }
}

pub fn entry(id: &str, project_id: Option<&str>, description: &str, in_progress: bool) -> TimeEntry {
    TimeEntry {
        id: id.to_string(),
        description: description.to_string(),
        project_id: project_id.map(str::to_string),
        task_id: None,
        time_interval: TimeInterval {
            start: datetime!(2024-05-01 08:00:00 UTC),
            end: if in_progress {
                None
            } else {
                Some(datetime!(2024-05-01 09:00:00 UTC))
            },
        },
    }
}

pub struct FakeApi {
    pub clients: Vec<WorkspaceClient>,
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub history: Vec<TimeEntry>,
    pub in_progress: Mutex<Option<TimeEntry>>,
    pub started: Mutex<Vec<NewTimeEntry>>,
    pub stop_error: Mutex<Option<ClockifyError>>,
    pub log: EventLog,
}

impl FakeApi {
    pub fn new(log: EventLog) -> Self {
        Self {
            clients: Vec::new(),
            projects: Vec::new(),
            tasks: Vec::new(),
            history: Vec::new(),
            in_progress: Mutex::new(None),
            started: Mutex::new(Vec::new()),
            stop_error: Mutex::new(None),
            log,
        }
    }

    fn record(&self, event: impl Into<String>) {
        self.log.lock().unwrap().push(event.into());
    }
}

#[async_trait]
impl TimeTracking for FakeApi {
    async fn current_user(&self) -> Result<User, ClockifyError> {
        Ok(User {
            id: "u1".to_string(),
            name: Some("Test User".to_string()),
            email: None,
        })
    }

    async fn workspaces(&self) -> Result<Vec<Workspace>, ClockifyError> {
        Ok(vec![Workspace {
            id: "w1".to_string(),
            name: "Test Workspace".to_string(),
        }])
    }

    async fn clients(&self, _workspace_id: &str) -> Result<Vec<WorkspaceClient>, ClockifyError> {
        Ok(self.clients.clone())
    }

    async fn projects(&self, _workspace_id: &str) -> Result<Vec<Project>, ClockifyError> {
        Ok(self.projects.clone())
    }

    async fn tasks(
        &self,
        _workspace_id: &str,
        project_id: &str,
    ) -> Result<Vec<Task>, ClockifyError> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn in_progress_entry(
        &self,
        _workspace_id: &str,
        _user_id: &str,
    ) -> Result<Option<TimeEntry>, ClockifyError> {
        Ok(self.in_progress.lock().unwrap().clone())
    }

    async fn time_entries(
        &self,
        _workspace_id: &str,
        _user_id: &str,
        _page_size: usize,
    ) -> Result<Vec<TimeEntry>, ClockifyError> {
        Ok(self.history.clone())
    }

    async fn start_entry(
        &self,
        _workspace_id: &str,
        entry: &NewTimeEntry,
    ) -> Result<TimeEntry, ClockifyError> {
        self.record(format!("remote:start:{}", entry.description));
        let mut started = self.started.lock().unwrap();
        started.push(entry.clone());
        let created = TimeEntry {
            id: format!("entry-{}", started.len()),
            description: entry.description.clone(),
            project_id: Some(entry.project_id.clone()),
            task_id: entry.task_id.clone(),
            time_interval: TimeInterval {
                start: entry.start,
                end: None,
            },
        };
        *self.in_progress.lock().unwrap() = Some(created.clone());
        Ok(created)
    }

    async fn stop_in_progress(
        &self,
        _workspace_id: &str,
        _user_id: &str,
        end: OffsetDateTime,
    ) -> Result<TimeEntry, ClockifyError> {
        self.record("remote:stop");
        if let Some(err) = self.stop_error.lock().unwrap().take() {
            return Err(err);
        }
        let mut in_progress = self.in_progress.lock().unwrap();
        match in_progress.take() {
            Some(mut entry) => {
                entry.time_interval.end = Some(end);
                Ok(entry)
            }
            None => Err(ClockifyError::NotFound {
                body: "no in-progress entry".to_string(),
            }),
        }
    }

    async fn create_task(
        &self,
        _workspace_id: &str,
        project_id: &str,
        name: &str,
    ) -> Result<Task, ClockifyError> {
        self.record(format!("remote:create_task:{}", name));
        Ok(Task {
            id: format!("task-{}", name),
            name: name.to_string(),
            project_id: project_id.to_string(),
        })
    }

    async fn delete_task(
        &self,
        _workspace_id: &str,
        _project_id: &str,
        task_id: &str,
    ) -> Result<(), ClockifyError> {
        self.record(format!("remote:delete_task:{}", task_id));
        Ok(())
    }
}

pub struct FakeTimer {
    pub phase: Mutex<Phase>,
    pub available: bool,
    pub log: EventLog,
}

impl FakeTimer {
    pub fn new(phase: Phase, log: EventLog) -> Self {
        Self {
            phase: Mutex::new(phase),
            available: true,
            log,
        }
    }

    pub fn unavailable(log: EventLog) -> Self {
        Self {
            phase: Mutex::new(Phase::Idle),
            available: false,
            log,
        }
    }

    fn record(&self, event: &str) -> Result<(), PomodoroError> {
        if !self.available {
            return Err(PomodoroError::Unavailable);
        }
        self.log.lock().unwrap().push(event.to_string());
        Ok(())
    }
}

impl SessionTimer for FakeTimer {
    fn phase(&self) -> Result<Phase, PomodoroError> {
        if !self.available {
            return Err(PomodoroError::Unavailable);
        }
        Ok(*self.phase.lock().unwrap())
    }

    fn start(&self) -> Result<(), PomodoroError> {
        self.record("timer:start")
    }

    fn stop(&self) -> Result<(), PomodoroError> {
        self.record("timer:stop")
    }

    fn pause(&self) -> Result<(), PomodoroError> {
        self.record("timer:pause")
    }

    fn resume(&self) -> Result<(), PomodoroError> {
        self.record("timer:resume")
    }

    fn skip(&self) -> Result<(), PomodoroError> {
        self.record("timer:skip")
    }
}
