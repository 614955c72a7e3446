use clap::{Parser, Subcommand};

/// Subcommand names that must be routed through clap. A single bare argument
/// outside this list is treated as a session-timer trigger string instead.
const BUILTIN_COMMANDS: &[&str] = &[
    "start", "stop", "resume", "pause", "skip", "complete", "info", "sync", "project", "task",
    "client", "projects", "tasks", "clients", "switch", "pomodoro", "help",
];

pub fn is_builtin_command(word: &str) -> bool {
    BUILTIN_COMMANDS.contains(&word)
}

#[derive(Debug, Parser)]
#[command(name = "tempo", about = "Clockify time tracking synced with a session timer")]
pub struct Cli {
    /// Clockify API token (persisted to the config file when given)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Workspace ID (persisted when given)
    #[arg(long, global = true)]
    pub workspace_id: Option<String>,

    /// Project ID (persisted when given)
    #[arg(long, global = true)]
    pub project_id: Option<String>,

    /// Deprecated spelling of --description
    #[arg(long, global = true)]
    pub task_name: Option<String>,

    /// Time entry description (persisted when given)
    #[arg(long, global = true)]
    pub description: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The effective description override, with `--task-name` kept as a
    /// backward-compatible alias.
    pub fn description_override(&self) -> Option<&str> {
        self.description
            .as_deref()
            .or(self.task_name.as_deref())
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start time tracking
    Start {
        /// Ignored; session-timer triggers pass flags like "enable" here
        #[arg(value_name = "FLAG")]
        flag: Option<String>,
    },
    /// Stop time tracking
    Stop,
    /// Resume time tracking (alias for start)
    Resume,
    /// Pause time tracking (alias for stop)
    Pause,
    /// Skip the current session-timer session and stop tracking
    Skip {
        /// Ignored; session-timer triggers pass flags like "disable" here
        #[arg(value_name = "FLAG")]
        flag: Option<String>,
    },
    /// Complete the current session (alias for stop)
    Complete,
    /// Show current tracking status
    Info,
    /// Reconcile tracking with the session-timer state
    Sync,
    /// Project management
    Project {
        #[command(subcommand)]
        action: Option<ProjectAction>,
    },
    /// Task and description management
    Task {
        #[command(subcommand)]
        action: Option<TaskAction>,
    },
    /// Client (customer) management
    Client {
        #[command(subcommand)]
        action: Option<ClientAction>,
    },
    /// List projects (legacy alias)
    Projects,
    /// List tasks (legacy alias)
    Tasks,
    /// List clients (legacy alias)
    Clients,
    /// Switch back to the previous task, like `cd -`
    Switch,
    /// Session-timer control
    Pomodoro {
        #[command(subcommand)]
        action: PomodoroAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProjectAction {
    /// List all projects
    List,
    /// Interactively select a project
    Select,
    /// Set the current project by name
    Set { name: String },
}

#[derive(Debug, Subcommand)]
pub enum ClientAction {
    /// List all clients
    List,
    /// Interactively select a client filter
    Select,
    /// Set the client filter by name
    Set { name: String },
    /// Clear the client filter
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum TaskAction {
    /// List formal tasks and recent descriptions
    List {
        /// History window for description entries
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Interactively select a task and description
    Select {
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Set the description directly, keeping the current task
    Set { name: String },
    /// Create a new formal task in the current project
    Create { name: String },
    /// Delete a formal task from the current project
    Delete { name: String },
}

#[derive(Debug, Subcommand)]
pub enum PomodoroAction {
    Start,
    Stop,
    Pause,
    Resume,
    Skip,
    Status,
}
