//! User inputs and their resolution into settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::provider::{
    BITBUCKET, BITBUCKET_DATACENTER, DEFAULT_BITBUCKET_SERVER_URL, DEFAULT_GITHUB_SERVER_URL,
    DEFAULT_GITLAB_SERVER_URL, ServerUrls,
};
use crate::ssh;
use crate::types::{RepositoryPattern, Transport};

use super::EventContext;

/// Raw inputs as given on the command line, in the environment or in an
/// inputs file. Unset fields are `None` so layers can be overlaid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Inputs {
    pub provider: Option<String>,
    pub repositories: Option<String>,
    pub token: Option<String>,
    pub ssh_key: Option<String>,
    pub ssh_known_hosts: Option<String>,
    pub ssh_strict: Option<bool>,
    pub github_server_url: Option<String>,
    pub gitlab_server_url: Option<String>,
    pub bitbucket_server_url: Option<String>,
}

impl Inputs {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Configuration(message) => {
                Error::configuration(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::configuration(format!("invalid inputs file: {}", e.message())))
    }

    /// Values set in `higher` replace ours.
    pub fn overlay(self, higher: Inputs) -> Inputs {
        Inputs {
            provider: higher.provider.or(self.provider),
            repositories: higher.repositories.or(self.repositories),
            token: higher.token.or(self.token),
            ssh_key: higher.ssh_key.or(self.ssh_key),
            ssh_known_hosts: higher.ssh_known_hosts.or(self.ssh_known_hosts),
            ssh_strict: higher.ssh_strict.or(self.ssh_strict),
            github_server_url: higher.github_server_url.or(self.github_server_url),
            gitlab_server_url: higher.gitlab_server_url.or(self.gitlab_server_url),
            bitbucket_server_url: higher.bitbucket_server_url.or(self.bitbucket_server_url),
        }
    }

    /// Apply defaults and event-derived values and validate the result.
    /// Fails before anything is written to disk.
    pub fn resolve(self, event: &EventContext) -> Result<Settings> {
        let token = non_blank(self.token);
        let ssh_key = self.ssh_key.filter(|k| !k.trim().is_empty());
        if token.is_some() && ssh_key.is_some() {
            return Err(Error::configuration(
                "input parameters 'token' and 'ssh-key' are mutually exclusive",
            ));
        }

        let provider = match non_blank(self.provider) {
            Some(provider) => provider.to_lowercase(),
            None => event.provider_id().ok_or_else(|| {
                Error::configuration(
                    "required input 'provider' not specified and could not be inferred from event",
                )
            })?,
        };

        let mut bitbucket_server_url = non_blank(self.bitbucket_server_url);
        if provider == BITBUCKET && bitbucket_server_url.is_none() {
            bitbucket_server_url = Some(DEFAULT_BITBUCKET_SERVER_URL.to_string());
        }
        if provider == BITBUCKET_DATACENTER && bitbucket_server_url.is_none() {
            bitbucket_server_url = Some(
                event
                    .provider_url
                    .clone()
                    .ok_or_else(|| Error::configuration("missing Bitbucket Server URL"))?,
            );
        }

        let repositories = match non_blank(self.repositories) {
            Some(raw) => RepositoryPattern::parse_list(&raw),
            None => repositories_from_event(&provider, event)?,
        };

        let auth = match (token, ssh_key) {
            (Some(token), _) => Auth::Token(token),
            (None, Some(key)) => Auth::SshKey(SshSettings {
                key: ssh::normalize_private_key(&key)?,
                known_hosts: self.ssh_known_hosts.unwrap_or_default(),
                strict: self.ssh_strict.unwrap_or(true),
            }),
            (None, None) => Auth::None,
        };

        let repositories = if repositories.is_empty() && auth.transport().is_ssh() {
            vec![RepositoryPattern::new(RepositoryPattern::ALL)]
        } else {
            repositories
        };

        Ok(Settings {
            provider,
            repositories,
            auth,
            server_urls: ServerUrls {
                github: Some(
                    non_blank(self.github_server_url)
                        .unwrap_or_else(|| DEFAULT_GITHUB_SERVER_URL.to_string()),
                ),
                gitlab: Some(
                    non_blank(self.gitlab_server_url)
                        .unwrap_or_else(|| DEFAULT_GITLAB_SERVER_URL.to_string()),
                ),
                bitbucket: bitbucket_server_url,
            },
        })
    }
}

/// `org/repo` in the event becomes `org/*` when the event is from the same
/// provider.
fn repositories_from_event(provider: &str, event: &EventContext) -> Result<Vec<RepositoryPattern>> {
    let (Some(event_provider), Some(repository)) = (event.provider_id(), &event.repository) else {
        return Ok(Vec::new());
    };
    if event_provider != provider {
        return Ok(Vec::new());
    }
    match repository.rfind('/') {
        Some(index) if index > 0 => Ok(vec![RepositoryPattern::new(format!(
            "{}/*",
            &repository[..index]
        ))]),
        _ => Err(Error::configuration(
            "required input 'repositories' not specified and could not be inferred from event",
        )),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// How Git authenticates.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// HTTPS with the helper installed but no stored token.
    None,
    /// HTTPS with a personal access token.
    Token(String),
    SshKey(SshSettings),
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Auth::None => f.write_str("None"),
            Auth::Token(_) => f.write_str("Token(<redacted>)"),
            Auth::SshKey(ssh) => f.debug_tuple("SshKey").field(ssh).finish(),
        }
    }
}

impl Auth {
    pub fn transport(&self) -> Transport {
        Transport::from_ssh(matches!(self, Auth::SshKey(_)))
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SshSettings {
    /// Parsed and newline terminated.
    pub key: String,
    pub known_hosts: String,
    pub strict: bool,
}

impl std::fmt::Debug for SshSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshSettings")
            .field("key", &"<redacted>")
            .field("known_hosts", &self.known_hosts)
            .field("strict", &self.strict)
            .finish()
    }
}

/// Validated inputs for one configure run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub provider: String,
    pub repositories: Vec<RepositoryPattern>,
    pub auth: Auth,
    pub server_urls: ServerUrls,
}

impl Settings {
    pub fn transport(&self) -> Transport {
        self.auth.transport()
    }

    /// Stable identifier for this set of repositories: the first 16 hex
    /// characters of a BLAKE3 hash over the sorted patterns, each followed
    /// by a NUL byte.
    pub fn unique_id(&self) -> String {
        let mut patterns: Vec<&str> = self.repositories.iter().map(|p| p.as_str()).collect();
        patterns.sort_unstable();

        let mut hasher = blake3::Hasher::new();
        for pattern in patterns {
            hasher.update(pattern.as_bytes());
            hasher.update(&[0]);
        }
        hasher.finalize().to_hex()[..16].to_string()
    }
}
