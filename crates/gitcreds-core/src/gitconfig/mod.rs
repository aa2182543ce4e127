//! Git configuration files, read and edited in place through libgit2.
//!
//! Keys are spelled `section.subsection.variable`. A subsection may contain
//! dots itself (URLs do), so a key splits at its first and last dot. libgit2
//! reports section and variable names in lower case and keeps subsections
//! as written.

pub mod merge;
pub mod paths;
pub mod store;

use git2::{Config, ErrorCode};

use crate::error::Result;

pub use merge::{apply_aliases, set_ssh_command};
pub use paths::global_config_path;
pub use store::ConfigFile;

/// A config entry name split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigKey<'a> {
    pub section: &'a str,
    pub subsection: Option<&'a str>,
    pub variable: &'a str,
}

impl<'a> ConfigKey<'a> {
    pub fn parse(name: &'a str) -> Option<Self> {
        let (section, rest) = name.split_once('.')?;
        let key = match rest.rsplit_once('.') {
            Some((subsection, variable)) => Self {
                section,
                subsection: Some(subsection),
                variable,
            },
            None => Self {
                section,
                subsection: None,
                variable: rest,
            },
        };
        Some(key)
    }

    /// Whether this key lives under `[section "subsection"]`.
    pub fn is_in(&self, section: &str, subsection: &str) -> bool {
        self.section.eq_ignore_ascii_case(section) && self.subsection == Some(subsection)
    }
}

/// `section.subsection.variable`
pub fn key(section: &str, subsection: &str, variable: &str) -> String {
    format!("{section}.{subsection}.{variable}")
}

/// Every value of `name` in file order. An absent key has none.
pub fn values(config: &Config, name: &str) -> Result<Vec<String>> {
    let entries = match config.multivar(name, None) {
        Ok(entries) => entries,
        Err(e) if e.code() == ErrorCode::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut values = Vec::new();
    entries.for_each(|entry| values.extend(entry.value().map(str::to_string)))?;
    Ok(values)
}

/// Leave exactly one value for `name`. An unchanged key is not rewritten.
pub fn set_single(config: &mut Config, name: &str, value: &str) -> Result<()> {
    if values(config, name)? == [value] {
        return Ok(());
    }
    unset_all(config, name)?;
    config.set_str(name, value)?;
    Ok(())
}

/// Remove every value of `name`. An absent key is not an error.
pub fn unset_all(config: &mut Config, name: &str) -> Result<()> {
    match config.remove_multivar(name, ".*") {
        Err(e) if e.code() != ErrorCode::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

/// Remove every variable under `[section "subsection"]`. As with
/// `git config --unset`, an emptied section header stays in the file.
pub fn remove_subsection(config: &mut Config, section: &str, subsection: &str) -> Result<()> {
    let mut names = Vec::new();
    config.entries(None)?.for_each(|entry| {
        let Some(name) = entry.name() else {
            return;
        };
        let inside = ConfigKey::parse(name).is_some_and(|k| k.is_in(section, subsection));
        if inside && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    })?;
    for name in names {
        unset_all(config, &name)?;
    }
    Ok(())
}

/// A value pattern for libgit2 matching `value` exactly.
pub(crate) fn exact_value(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('^');
    for ch in value.chars() {
        if "\\^$.|?*+()[]{}".contains(ch) {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('$');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(dir: &TempDir, content: &str) -> Config {
        let path = dir.path().join("config");
        std::fs::write(&path, content).unwrap();
        Config::open(&path).unwrap()
    }

    #[test]
    fn key_splits_at_first_and_last_dot() {
        assert_eq!(
            ConfigKey::parse("url.https://github.com/acme/.insteadof"),
            Some(ConfigKey {
                section: "url",
                subsection: Some("https://github.com/acme/"),
                variable: "insteadof",
            })
        );
        assert_eq!(
            ConfigKey::parse("core.sshcommand"),
            Some(ConfigKey {
                section: "core",
                subsection: None,
                variable: "sshcommand",
            })
        );
        assert_eq!(ConfigKey::parse("nodot"), None);
    }

    #[test]
    fn values_of_absent_key_are_empty() {
        let dir = TempDir::new().unwrap();
        let config = open(&dir, "[user]\n\tname = Jane\n");
        assert!(values(&config, "url.https://a/.insteadOf").unwrap().is_empty());
        assert_eq!(values(&config, "user.name").unwrap(), ["Jane"]);
    }

    #[test]
    fn set_single_collapses_repeated_values() {
        let dir = TempDir::new().unwrap();
        let mut config = open(&dir, "[credential]\n\thelper = a\n\thelper = b\n");

        set_single(&mut config, "credential.helper", "c").unwrap();

        assert_eq!(values(&config, "credential.helper").unwrap(), ["c"]);
    }

    #[test]
    fn remove_subsection_keeps_neighbours() {
        let dir = TempDir::new().unwrap();
        let mut config = open(
            &dir,
            "[url \"https://a/\"]\n\tinsteadOf = x\n\tinsteadOf = y\n\
             [url \"https://a/b/\"]\n\tinsteadOf = z\n",
        );

        remove_subsection(&mut config, "url", "https://a/").unwrap();
        remove_subsection(&mut config, "url", "https://missing/").unwrap();

        assert!(values(&config, "url.https://a/.insteadOf").unwrap().is_empty());
        assert_eq!(values(&config, "url.https://a/b/.insteadOf").unwrap(), ["z"]);
    }

    #[test]
    fn exact_value_escapes_pattern_characters() {
        assert_eq!(exact_value("git@github.com:a/"), "^git@github\\.com:a/$");
        assert_eq!(exact_value("a+(b)"), "^a\\+\\(b\\)$");
    }
}
