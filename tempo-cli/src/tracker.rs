use clockify::models::NewTimeEntry;
use clockify::ClockifyError;
use thiserror::Error;
use time::OffsetDateTime;

use crate::api::TimeTracking;
use crate::config::{Config, Selection};
use crate::context;
use crate::pomodoro::{Phase, SessionTimer};
use crate::store::Store;

/// Resume triggers arriving this soon after a manual stop, while the
/// session timer reports no state, are treated as the timer auto-detecting
/// activity rather than genuine work starting.
const RESUME_COOLDOWN_SECS: i64 = 10;

/// What a trigger string asks the dispatcher to do. Classification is
/// case-insensitive on the first word; everything unrecognized stops
/// tracking, so a garbled trigger can never leave a timer running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Stop,
}

impl Action {
    pub fn classify(trigger: &str) -> Action {
        let first = trigger
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match first.as_str() {
            "start" | "resume" => Action::Start,
            _ => Action::Stop,
        }
    }
}

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("missing required configuration: {0}")]
    ConfigMissing(&'static str),
    #[error("no current project; run `tempo project` or pass --project-id")]
    NoCurrentProject,
    #[error("no description set; run `tempo task` or pass --description")]
    NoDescription,
    #[error("clockify request failed: {0}")]
    Remote(#[from] ClockifyError),
    #[error(transparent)]
    State(#[from] anyhow::Error),
}

#[derive(Debug, PartialEq, Eq)]
pub enum StartOutcome {
    Started { entry_id: String, description: String },
    /// The remote service already has an in-progress entry; redundant
    /// triggers within one session transition land here.
    AlreadyRunning,
    /// The session timer is on a break, so no work is actually starting.
    OnBreak(Phase),
    /// A resume fired right after a manual stop while the timer reported
    /// no state; almost certainly spurious.
    RecentStop { seconds_ago: i64 },
}

#[derive(Debug, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped { description: String },
    /// The remote service no longer knew the cached entry; local state was
    /// cleared to match and the goal state (nothing tracked) holds.
    Reconciled,
    NoActiveEntry,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    Started(StartOutcome),
    Stopped(StopOutcome),
    InSync,
}

/// The trigger dispatcher. Every external trigger and manual start/stop
/// flows through here; it reconciles the advisory local run state with the
/// remote service's authoritative in-progress entry.
pub struct Tracker<'a, A, T>
where
    A: TimeTracking,
    T: SessionTimer,
{
    api: &'a A,
    timer: &'a T,
    store: &'a Store,
}

impl<'a, A, T> Tracker<'a, A, T>
where
    A: TimeTracking,
    T: SessionTimer,
{
    pub fn new(api: &'a A, timer: &'a T, store: &'a Store) -> Self {
        Self { api, timer, store }
    }

    fn workspace(config: &Config) -> Result<String, TrackerError> {
        config
            .workspace_id
            .clone()
            .ok_or(TrackerError::ConfigMissing("workspace_id"))
    }

    pub async fn start(&self, config: &mut Config) -> Result<StartOutcome, TrackerError> {
        let workspace = Self::workspace(config)?;
        let user = self.api.current_user().await?;

        if self
            .api
            .in_progress_entry(&workspace, &user.id)
            .await?
            .is_some()
        {
            tracing::info!("remote entry already in progress, ignoring start trigger");
            return Ok(StartOutcome::AlreadyRunning);
        }

        match self.timer.phase() {
            Ok(phase) if phase.is_break() => return Ok(StartOutcome::OnBreak(phase)),
            Ok(Phase::Work) => {}
            // idle or unreachable timer: the trigger may be the timer
            // auto-resuming right after a manual stop
            _ => {
                if let Some(last_stop) = config.last_stop_time {
                    let seconds_ago = OffsetDateTime::now_utc().unix_timestamp() - last_stop;
                    if seconds_ago < RESUME_COOLDOWN_SECS {
                        return Ok(StartOutcome::RecentStop { seconds_ago });
                    }
                }
            }
        }

        let project_id = context::project_id_from(None, config).ok_or(TrackerError::NoCurrentProject)?;
        let description = config
            .description
            .clone()
            .or_else(|| config.task_name.clone())
            .ok_or(TrackerError::NoDescription)?;
        let task_id = self.validated_task_id(config, &workspace, &project_id).await;

        let entry = self
            .api
            .start_entry(
                &workspace,
                &NewTimeEntry {
                    start: OffsetDateTime::now_utc(),
                    description: description.clone(),
                    project_id,
                    task_id,
                },
            )
            .await?;

        self.store.save_run_state(&entry.id)?;
        config.last_stop_time = None;
        self.store.save_config(config)?;

        Ok(StartOutcome::Started {
            entry_id: entry.id,
            description,
        })
    }

    /// The configured task id, dropped (and cleared from config) when the
    /// task no longer exists in the project. A deleted task must not make
    /// every future start fail.
    async fn validated_task_id(
        &self,
        config: &mut Config,
        workspace: &str,
        project_id: &str,
    ) -> Option<String> {
        let task_id = config.task_id.clone()?;
        match self.api.tasks(workspace, project_id).await {
            Ok(tasks) if tasks.iter().any(|t| t.id == task_id) => Some(task_id),
            Ok(_) => {
                tracing::warn!(
                    task_id,
                    project_id,
                    "configured task no longer exists in project, starting without it"
                );
                config.task_id = None;
                config.task_name = None;
                None
            }
            Err(e) => {
                tracing::warn!("could not validate configured task: {e}");
                Some(task_id)
            }
        }
    }

    pub async fn stop(&self, config: &mut Config) -> Result<StopOutcome, TrackerError> {
        if self.store.load_run_state()?.is_none() {
            return Ok(StopOutcome::NoActiveEntry);
        }
        self.stop_remote(config).await
    }

    /// Stop the remote in-progress entry, bypassing the run-state gate.
    /// Not-found means the entry is already gone, so clear local state and
    /// treat the goal (nothing tracked) as reached.
    async fn stop_remote(&self, config: &mut Config) -> Result<StopOutcome, TrackerError> {
        let workspace = Self::workspace(config)?;
        let user = self.api.current_user().await?;

        match self
            .api
            .stop_in_progress(&workspace, &user.id, OffsetDateTime::now_utc())
            .await
        {
            Ok(entry) => {
                self.store.clear_run_state()?;
                config.last_stop_time = Some(OffsetDateTime::now_utc().unix_timestamp());
                self.store.save_config(config)?;
                Ok(StopOutcome::Stopped {
                    description: entry.description,
                })
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("remote no longer knows the cached entry, clearing run state");
                self.store.clear_run_state()?;
                config.last_stop_time = Some(OffsetDateTime::now_utc().unix_timestamp());
                self.store.save_config(config)?;
                Ok(StopOutcome::Reconciled)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Change the active selection, preserving the illusion of one
    /// continuous tracked session: stop the running entry, persist the new
    /// selection, and only when the session timer was in a work state,
    /// start a fresh entry and resume the timer -- in that order.
    pub async fn change_selection(
        &self,
        config: &mut Config,
        selection: Selection,
        save_previous: bool,
    ) -> Result<(), TrackerError> {
        let workspace = Self::workspace(config)?;
        let user = self.api.current_user().await?;

        let was_tracking = self
            .api
            .in_progress_entry(&workspace, &user.id)
            .await?
            .is_some();
        let timer_was_running = self.timer.is_running();

        if was_tracking {
            println!("Stopping current time entry...");
            match self.stop_remote(config).await {
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("failed to stop current entry, continuing: {e}");
                }
            }
            if timer_was_running {
                println!("Pausing session timer...");
                if let Err(e) = self.timer.pause() {
                    tracing::warn!("failed to pause session timer: {e}");
                }
            }
        }

        if save_previous {
            config.remember_previous();
        }
        config.apply_selection(selection);
        self.store.save_config(config)?;

        if was_tracking && timer_was_running {
            println!("Restarting time entry with new selection...");
            match self.start(config).await? {
                StartOutcome::Started { description, .. } => {
                    println!("Time entry started: {}", description);
                }
                other => {
                    tracing::warn!(?other, "time entry was not restarted");
                }
            }
            println!("Resuming session timer...");
            if let Err(e) = self.timer.resume() {
                tracing::warn!("failed to resume session timer: {e}");
            }
        } else if was_tracking {
            println!("Use `tempo start` to begin tracking with the new selection.");
        }

        Ok(())
    }

    pub async fn change_description(
        &self,
        config: &mut Config,
        description: &str,
    ) -> Result<(), TrackerError> {
        let mut selection = config.selection();
        selection.description = Some(description.to_string());
        self.change_selection(config, selection, false).await?;
        println!("Description updated to: {}", description);
        Ok(())
    }

    /// Reconcile tracking with the session timer: whichever side is
    /// running wins over the side that is not.
    pub async fn sync(&self, config: &mut Config) -> Result<SyncOutcome, TrackerError> {
        let workspace = Self::workspace(config)?;
        let user = self.api.current_user().await?;

        let remote_running = self
            .api
            .in_progress_entry(&workspace, &user.id)
            .await?
            .is_some();
        let timer_running = self.timer.is_running();

        if timer_running && !remote_running {
            Ok(SyncOutcome::Started(self.start(config).await?))
        } else if !timer_running && remote_running {
            Ok(SyncOutcome::Stopped(self.stop_remote(config).await?))
        } else {
            Ok(SyncOutcome::InSync)
        }
    }
}
