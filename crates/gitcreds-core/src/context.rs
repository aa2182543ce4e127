//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};

use crate::config::EventContext;
use crate::error::{Error, Result};
use crate::gitconfig::{ConfigFile, global_config_path};

/// Directory under the home directory holding per-run artifacts.
pub const ACTION_ROOT: &str = ".gitcreds";

/// Paths and environment a configure run works against.
///
/// Frontends create this once and pass it down. Nothing below it reads the
/// process environment.
#[derive(Debug, Clone)]
pub struct AppContext {
    home_dir: PathBuf,
    git_config_path: PathBuf,
    helper_executable: PathBuf,
    event_path: Option<PathBuf>,
}

impl AppContext {
    /// Create a context with explicit paths.
    pub fn new(home_dir: PathBuf, git_config_path: PathBuf, helper_executable: PathBuf) -> Self {
        Self {
            home_dir,
            git_config_path,
            helper_executable,
            event_path: None,
        }
    }

    /// Resolve the global Git config under `home_dir` the way Git does.
    pub fn for_home(
        home_dir: PathBuf,
        xdg_config_home: Option<&Path>,
        helper_executable: PathBuf,
    ) -> Self {
        let git_config_path = global_config_path(&home_dir, xdg_config_home);
        Self::new(home_dir, git_config_path, helper_executable)
    }

    /// Build from the current user's home directory and running executable.
    pub fn discover(xdg_config_home: Option<&Path>) -> Result<Self> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| Error::configuration("could not determine home directory"))?;
        let helper_executable = std::env::current_exe()
            .map_err(|e| Error::io("<current executable>", e))?;
        Ok(Self::for_home(home_dir, xdg_config_home, helper_executable))
    }

    pub fn with_event_path(mut self, event_path: Option<PathBuf>) -> Self {
        self.event_path = event_path;
        self
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn git_config_path(&self) -> &Path {
        &self.git_config_path
    }

    pub fn helper_executable(&self) -> &Path {
        &self.helper_executable
    }

    pub fn event_path(&self) -> Option<&Path> {
        self.event_path.as_deref()
    }

    /// `<home>/.gitcreds/<id>`
    pub fn action_dir(&self, unique_id: &str) -> PathBuf {
        self.home_dir.join(ACTION_ROOT).join(unique_id)
    }

    pub fn git_config_file(&self) -> ConfigFile {
        ConfigFile::new(&self.git_config_path)
    }

    pub fn event_context(&self) -> EventContext {
        EventContext::load(self.event_path())
    }
}
