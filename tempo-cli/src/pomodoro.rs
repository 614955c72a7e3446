use std::fmt;
use std::process::Command;
use thiserror::Error;

const DBUS_DEST: &str = "org.gnome.Pomodoro";
const DBUS_PATH: &str = "/org/gnome/Pomodoro";
const DBUS_INTERFACE: &str = "org.gnome.Pomodoro";

#[derive(Error, Debug)]
pub enum PomodoroError {
    #[error("gdbus command not found; is D-Bus available?")]
    Unavailable,
    #[error("D-Bus call failed: {0}")]
    Call(String),
}

/// The session timer's named state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
    Idle,
}

impl Phase {
    fn parse(raw: &str) -> Phase {
        match raw {
            "pomodoro" => Phase::Work,
            "short-break" => Phase::ShortBreak,
            "long-break" => Phase::LongBreak,
            _ => Phase::Idle,
        }
    }

    pub fn is_break(self) -> bool {
        matches!(self, Phase::ShortBreak | Phase::LongBreak)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Work => "pomodoro",
            Phase::ShortBreak => "short-break",
            Phase::LongBreak => "long-break",
            Phase::Idle => "idle",
        };
        write!(f, "{}", name)
    }
}

/// Narrow collaborator interface over the external session timer. The
/// dispatcher only ever sends commands and reads the current phase; the
/// timer's own scheduling stays outside this program.
pub trait SessionTimer {
    fn phase(&self) -> Result<Phase, PomodoroError>;
    fn start(&self) -> Result<(), PomodoroError>;
    fn stop(&self) -> Result<(), PomodoroError>;
    fn pause(&self) -> Result<(), PomodoroError>;
    fn resume(&self) -> Result<(), PomodoroError>;
    fn skip(&self) -> Result<(), PomodoroError>;

    fn is_running(&self) -> bool {
        matches!(self.phase(), Ok(Phase::Work))
    }
}

/// GNOME Pomodoro over the session bus, via `gdbus` (the timer exposes no
/// other stable external interface).
pub struct GnomePomodoro;

impl GnomePomodoro {
    fn run(&self, args: &[&str]) -> Result<String, PomodoroError> {
        let output = Command::new("gdbus").args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PomodoroError::Unavailable
            } else {
                PomodoroError::Call(e.to_string())
            }
        })?;

        if !output.status.success() {
            return Err(PomodoroError::Call(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn call_method(&self, method: &str) -> Result<String, PomodoroError> {
        self.run(&[
            "call",
            "--session",
            "--dest",
            DBUS_DEST,
            "--object-path",
            DBUS_PATH,
            "--method",
            &format!("{}.{}", DBUS_INTERFACE, method),
        ])
    }

    fn get_property(&self, property: &str) -> Result<String, PomodoroError> {
        self.run(&[
            "call",
            "--session",
            "--dest",
            DBUS_DEST,
            "--object-path",
            DBUS_PATH,
            "--method",
            "org.freedesktop.DBus.Properties.Get",
            DBUS_INTERFACE,
            property,
        ])
    }
}

impl SessionTimer for GnomePomodoro {
    fn phase(&self) -> Result<Phase, PomodoroError> {
        // gdbus prints variants like "(<'pomodoro'>,)"
        let raw = self.get_property("State")?;
        let state = raw.split('\'').nth(1).unwrap_or("");
        Ok(Phase::parse(state))
    }

    fn start(&self) -> Result<(), PomodoroError> {
        self.call_method("Start").map(|_| ())
    }

    fn stop(&self) -> Result<(), PomodoroError> {
        self.call_method("Stop").map(|_| ())
    }

    fn pause(&self) -> Result<(), PomodoroError> {
        self.call_method("Pause").map(|_| ())
    }

    fn resume(&self) -> Result<(), PomodoroError> {
        self.call_method("Resume").map(|_| ())
    }

    fn skip(&self) -> Result<(), PomodoroError> {
        self.call_method("Skip").map(|_| ())
    }
}
