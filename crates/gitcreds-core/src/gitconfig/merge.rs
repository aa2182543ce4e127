//! Merging alias rewrites and credential helpers into a Git config.

use git2::Config;
use tracing::info;

use crate::alias::AliasMapping;
use crate::error::Result;
use crate::provider::UrlSource;

use super::{exact_value, key, remove_subsection, set_single, unset_all, values};

const URL_SECTION: &str = "url";
const CREDENTIAL_SECTION: &str = "credential";

/// Write `url.<canonical>.insteadOf` rewrites and, when `helper` is given,
/// `credential.<url>.helper` entries.
///
/// For each canonical URL, subsections named after any of its aliases are
/// cleared first so no stale rewrite survives under another key. Without a
/// helper, a credential entry for the canonical URL is cleared. A canonical
/// URL with no aliases gets no rewrite section. Applying the same mapping
/// twice leaves the file unchanged.
pub fn apply_aliases(
    config: &mut Config,
    mapping: &AliasMapping,
    source: &dyn UrlSource,
    helper: Option<&str>,
) -> Result<()> {
    for entry in mapping {
        for alias in &entry.aliases {
            if alias != &entry.canonical {
                remove_subsection(config, URL_SECTION, alias)?;
            }
            remove_subsection(config, CREDENTIAL_SECTION, alias)?;
        }

        let instead_of = key(URL_SECTION, &entry.canonical, "insteadOf");
        if values(config, &instead_of)? != entry.aliases {
            unset_all(config, &instead_of)?;
            for alias in &entry.aliases {
                config.set_multivar(&instead_of, &exact_value(alias), alias)?;
            }
        }
        for alias in &entry.aliases {
            info!("configuring git to clone from {} instead of {}", entry.canonical, alias);
        }

        match helper {
            Some(command) => {
                let scope = source.credential_scope(&entry.canonical);
                set_single(config, &key(CREDENTIAL_SECTION, &scope, "helper"), command)?;
                set_single(config, &key(CREDENTIAL_SECTION, &scope, "useHttpPath"), "true")?;
            }
            None => remove_subsection(config, CREDENTIAL_SECTION, &entry.canonical)?,
        }
    }
    Ok(())
}

/// Point `core.sshCommand` at the installed key.
pub fn set_ssh_command(config: &mut Config, command: &str) -> Result<()> {
    set_single(config, "core.sshCommand", command)
}
