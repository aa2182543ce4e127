//! Opening and editing a Git config file on disk.

use std::path::{Path, PathBuf};

use git2::Config;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    private: bool,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            private: false,
        }
    }

    /// A file only the current user may read, for configs holding secrets.
    pub fn private(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            private: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the file. A missing file reads as empty and is created by the
    /// first edit.
    pub fn open(&self) -> Result<Config> {
        Ok(Config::open(&self.path)?)
    }

    /// Like [`open`](Self::open), but the file must already exist.
    pub fn open_existing(&self) -> Result<Config> {
        std::fs::metadata(&self.path).map_err(|e| Error::io(&self.path, e))?;
        self.open()
    }

    /// Create the file and its parents when missing.
    pub fn ensure_exists(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::io(&self.path, e))?;
        self.restrict()
    }

    /// Run `edit` against `config`, which libgit2 writes through to disk.
    /// The file exists afterwards, and a private file is left readable by
    /// its owner only.
    pub fn edit<T>(
        &self,
        config: &mut Config,
        edit: impl FnOnce(&mut Config) -> Result<T>,
    ) -> Result<T> {
        self.ensure_exists()?;
        let result = edit(config);
        self.restrict()?;
        result
    }

    fn restrict(&self) -> Result<()> {
        if self.private {
            restrict_to_owner(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(unix)]
pub(crate) fn restrict_to_owner(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| Error::io(path, e))
}

#[cfg(not(unix))]
pub(crate) fn restrict_to_owner(_path: &Path) -> Result<()> {
    Ok(())
}
