//! Configure orchestration: inputs in, Git global config and helper files out.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::alias::{AliasMapping, resolve};
use crate::config::{Auth, Inputs, Settings, SshSettings};
use crate::context::AppContext;
use crate::credential::store_credential;
use crate::error::{Error, Result};
use crate::gitconfig::{ConfigFile, apply_aliases, set_ssh_command};
use crate::provider::{ProviderRegistry, UrlSource};
use crate::ssh;
use crate::types::Transport;

pub const HELPER_EXECUTABLE: &str = "git-credential-helper";

/// What a configure run changed.
#[derive(Debug, Clone)]
pub struct ConfigureReport {
    pub provider: String,
    pub transport: Transport,
    pub mapping: AliasMapping,
    pub git_config_path: PathBuf,
    pub action_dir: PathBuf,
    /// Side file written for the credential helper, HTTPS mode only.
    pub helper_config_path: Option<PathBuf>,
    /// Installed key, SSH mode only.
    pub private_key_path: Option<PathBuf>,
}

/// What the Git config needs once credentials are installed.
struct Plan {
    helper: Option<String>,
    side_file: Option<ConfigFile>,
    ssh_command: Option<String>,
    private_key_path: Option<PathBuf>,
}

/// Orchestrates one configure run.
///
/// `cancel` is checked before each file write; once set, the run stops with
/// [`Error::Cancelled`] naming the file it did not write.
#[derive(Debug)]
pub struct Configurator<'a> {
    ctx: &'a AppContext,
    cancel: &'a AtomicBool,
}

impl<'a> Configurator<'a> {
    pub fn new(ctx: &'a AppContext, cancel: &'a AtomicBool) -> Self {
        Self { ctx, cancel }
    }

    pub fn run(&self, inputs: Inputs) -> Result<ConfigureReport> {
        let settings = inputs.resolve(&self.ctx.event_context())?;
        debug!(?settings, "resolved inputs");

        let registry = ProviderRegistry::with_server_urls(&settings.server_urls);
        let source = registry.get(&settings.provider).ok_or_else(|| {
            Error::configuration(format!(
                "unknown provider '{}', expected one of: {}",
                settings.provider,
                registry.provider_ids().join(", ")
            ))
        })?;

        let transport = settings.transport();
        let mapping = resolve(source, &settings.repositories, transport)?;

        let git_config_file = self.ctx.git_config_file();
        info!("parsing existing git global config");
        let mut git_config = git_config_file.open()?;
        info!(path = %git_config_file.path().display(), "git global config parsed");

        let action_dir = self.ctx.action_dir(&settings.unique_id());
        self.check_cancelled(&action_dir)?;
        std::fs::create_dir_all(&action_dir).map_err(|e| Error::io(&action_dir, e))?;

        let plan = match &settings.auth {
            Auth::SshKey(ssh) => self.install_ssh(&action_dir, ssh)?,
            Auth::Token(_) | Auth::None => self.install_helper(&action_dir)?,
        };

        let mut helper_config_path = None;
        if let Some(side_file) = &plan.side_file {
            self.check_cancelled(side_file.path())?;
            store_tokens(side_file, &settings, source, &mapping)?;
            helper_config_path = Some(side_file.path().to_path_buf());
        }

        info!(path = %git_config_file.path().display(), "updating git global config");
        self.check_cancelled(git_config_file.path())?;
        git_config_file.edit(&mut git_config, |config| {
            if let Some(command) = &plan.ssh_command {
                set_ssh_command(config, command)?;
            }
            apply_aliases(config, &mapping, source, plan.helper.as_deref())
        })?;
        info!(path = %git_config_file.path().display(), "git global config updated");

        Ok(ConfigureReport {
            provider: settings.provider,
            transport,
            mapping,
            git_config_path: git_config_file.path().to_path_buf(),
            action_dir,
            helper_config_path,
            private_key_path: plan.private_key_path,
        })
    }

    fn install_ssh(&self, action_dir: &Path, settings: &SshSettings) -> Result<Plan> {
        info!("installing SSH private key");
        self.check_cancelled(&action_dir.join(ssh::PRIVATE_KEY_FILE))?;
        let key_path = ssh::install_private_key(action_dir, &settings.key)?;

        self.check_cancelled(&action_dir.join(ssh::KNOWN_HOSTS_FILE))?;
        let known_hosts = ssh::write_known_hosts(self.ctx.home_dir(), action_dir, &settings.known_hosts)?;

        info!("SSH private key installed");
        Ok(Plan {
            helper: None,
            side_file: None,
            ssh_command: Some(ssh::ssh_command(&key_path, settings.strict, &known_hosts)),
            private_key_path: Some(key_path),
        })
    }

    fn install_helper(&self, action_dir: &Path) -> Result<Plan> {
        info!("installing credentials helper");
        let helper_path = action_dir.join(HELPER_EXECUTABLE);
        self.check_cancelled(&helper_path)?;
        copy_executable(self.ctx.helper_executable(), &helper_path)?;
        info!("credentials helper installed");

        let mut config_path = OsString::from(helper_path.as_os_str());
        config_path.push(".cfg");
        let config_file = ConfigFile::private(PathBuf::from(config_path));

        let command = format!(
            "{} credential-helper --config-file {}",
            ssh::shell_escape(&helper_path.to_string_lossy()),
            ssh::shell_escape(&config_file.path().to_string_lossy())
        );

        Ok(Plan {
            helper: Some(command),
            side_file: Some(config_file),
            ssh_command: None,
            private_key_path: None,
        })
    }

    fn check_cancelled(&self, next: &Path) -> Result<()> {
        if self.cancel.load(Ordering::SeqCst) {
            return Err(Error::Cancelled(next.to_path_buf()));
        }
        Ok(())
    }
}

/// Record the token for every canonical URL in the side file, keeping the
/// entries earlier runs left there. An unreadable side file is replaced.
fn store_tokens(
    side_file: &ConfigFile,
    settings: &Settings,
    source: &dyn UrlSource,
    mapping: &AliasMapping,
) -> Result<()> {
    let mut config = match side_file.open() {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %side_file.path().display(), error = %e, "discarding existing helper config");
            std::fs::remove_file(side_file.path()).map_err(|e| Error::io(side_file.path(), e))?;
            side_file.open()?
        }
    };

    side_file.edit(&mut config, |config| {
        let Auth::Token(token) = &settings.auth else {
            return Ok(());
        };
        for canonical in mapping.canonical_urls() {
            store_credential(config, canonical, source.token_username(), token)?;
        }
        Ok(())
    })
}

/// Copy the running binary into place. Running from the installed copy is
/// not an error. An older copy is unlinked first so a Git process still
/// executing it keeps its file.
fn copy_executable(from: &Path, to: &Path) -> Result<()> {
    let same = match (from.canonicalize(), to.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if same {
        debug!(path = %to.display(), "helper already installed from this binary");
        return Ok(());
    }
    match std::fs::remove_file(to) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(Error::io(to, e)),
        _ => {}
    }
    std::fs::copy(from, to).map_err(|e| Error::io(to, e))?;
    Ok(())
}
