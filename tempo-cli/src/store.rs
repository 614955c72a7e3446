use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;

const CONFIG_FILE: &str = "config.toml";
const RUN_STATE_FILE: &str = "current_entry";

/// File-backed state store. Two records: the durable [`Config`] and the
/// ephemeral run state (the believed-active entry id). Every command
/// reloads from disk; nothing is cached in memory across operations.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn default_location() -> Result<Self> {
        Ok(Self {
            dir: dirs::config_dir()
                .context("Cannot determine config directory")?
                .join("tempo"),
        })
    }

    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    fn run_state_path(&self) -> PathBuf {
        self.dir.join(RUN_STATE_FILE)
    }

    /// Load config from disk. A missing file yields the default config; a
    /// file that exists but fails to parse is an error, so a corrupt config
    /// is never silently clobbered.
    pub fn load_config(&self) -> Result<Config> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(Config::default());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    pub fn save_config(&self, config: &Config) -> Result<()> {
        let raw = toml::to_string_pretty(config)?;
        write_atomic(&self.config_path(), &raw)
    }

    /// The entry id this process believes is running, if any. Advisory: it
    /// may be stale or reference an entry the remote service has dropped.
    pub fn load_run_state(&self) -> Result<Option<String>> {
        let path = self.run_state_path();
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).context("Failed to read run state file")?;
        let id = raw.trim().to_string();
        if id.is_empty() {
            return Ok(None);
        }
        Ok(Some(id))
    }

    pub fn save_run_state(&self, entry_id: &str) -> Result<()> {
        write_atomic(&self.run_state_path(), entry_id)
    }

    pub fn clear_run_state(&self) -> Result<()> {
        let path = self.run_state_path();
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}

/// Write-then-rename so a crash never leaves a half-written file.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("No parent directory for {}", path.display()))?;
    fs::create_dir_all(parent)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to rename {} into place", tmp.display()))?;
    Ok(())
}
