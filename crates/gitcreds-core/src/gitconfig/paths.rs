//! Global Git config path resolution.

use std::path::{Path, PathBuf};

/// Locate the user's global Git config the way Git does for writes.
///
/// `~/.gitconfig` wins when it exists. Otherwise the XDG file
/// (`$XDG_CONFIG_HOME/git/config`, or `~/.config/git/config` when the
/// variable is unset) is used if it exists. With neither present the result
/// is `~/.gitconfig`, which is where a new file gets created.
pub fn global_config_path(home: &Path, xdg_config_home: Option<&Path>) -> PathBuf {
    let dotfile = home.join(".gitconfig");
    if dotfile.exists() {
        return dotfile;
    }

    let xdg = xdg_config_home
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| home.join(".config"))
        .join("git")
        .join("config");
    if xdg.exists() {
        return xdg;
    }

    dotfile
}
