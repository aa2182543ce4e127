//! The helper's side file: credentials keyed by protocol and URL prefix.
//!
//! ```text
//! [https "//github.com/acme/"]
//!     username = x-access-token
//!     password = <base64>
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use git2::Config;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::gitconfig::{ConfigKey, key, set_single};

/// One `[<protocol> "<prefix>"]` subsection. The password is still base64
/// encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialEntry {
    pub protocol: String,
    pub prefix: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialEntry {
    pub fn new(protocol: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            prefix: prefix.into(),
            username: None,
            password: None,
        }
    }

    pub fn decoded_password(&self) -> Result<Option<String>> {
        let Some(encoded) = &self.password else {
            return Ok(None);
        };
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| Error::protocol(format!("stored password for {} is not base64: {e}", self.prefix)))?;
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| Error::protocol(format!("stored password for {} is not UTF-8", self.prefix)))
    }
}

/// Side file entries in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialTable {
    entries: Vec<CredentialEntry>,
}

impl CredentialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every subsection of `config`. A subsection declared twice
    /// keeps its first position and its last values, as Git reads it.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut table = Self::new();
        config.entries(None)?.for_each(|entry| {
            let (Some(name), Some(value)) = (entry.name(), entry.value()) else {
                return;
            };
            if let Some(ConfigKey {
                section,
                subsection: Some(prefix),
                variable,
            }) = ConfigKey::parse(name)
            {
                table.absorb(section, prefix, variable, value);
            }
        })?;
        Ok(table)
    }

    fn absorb(&mut self, protocol: &str, prefix: &str, variable: &str, value: &str) {
        let index = match self
            .entries
            .iter()
            .position(|e| e.protocol.eq_ignore_ascii_case(protocol) && e.prefix == prefix)
        {
            Some(index) => index,
            None => {
                self.entries.push(CredentialEntry::new(protocol, prefix));
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[index];
        if variable.eq_ignore_ascii_case("username") {
            entry.username = Some(value.to_string());
        } else if variable.eq_ignore_ascii_case("password") {
            entry.password = Some(value.to_string());
        }
    }

    pub fn entries(&self) -> &[CredentialEntry] {
        &self.entries
    }

    /// Find the entry with the longest prefix of `//host/path`. Among equally
    /// long prefixes the first declared wins.
    pub fn lookup(&self, protocol: &str, host: &str, path: &str) -> Option<&CredentialEntry> {
        let target = request_target(host, path);

        let mut closest = None;
        for entry in &self.entries {
            if !entry.protocol.eq_ignore_ascii_case(protocol) || !target.starts_with(&entry.prefix) {
                continue;
            }
            if closest.is_none_or(|c: &CredentialEntry| c.prefix.len() < entry.prefix.len()) {
                closest = Some(entry);
            }
        }

        debug!(
            target = %target,
            matched = closest.map(|e| e.prefix.as_str()),
            "credential lookup"
        );
        closest
    }
}

impl FromIterator<CredentialEntry> for CredentialTable {
    fn from_iter<I: IntoIterator<Item = CredentialEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Store `username` and the base64 encoded `password` for every request
/// under `url`.
pub fn store_credential(config: &mut Config, url: &str, username: &str, password: &str) -> Result<()> {
    let (protocol, prefix) = key_for_url(url)?;
    set_single(config, &key(&protocol, &prefix, "username"), username)?;
    set_single(config, &key(&protocol, &prefix, "password"), &STANDARD.encode(password))
}

/// Split a clone URL into its protocol and `//host[:port]/path` key.
pub fn key_for_url(url: &str) -> Result<(String, String)> {
    let parsed = Url::parse(url).map_err(|source| Error::UrlParse {
        url: url.to_string(),
        source,
    })?;
    let host = match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };
    Ok((parsed.scheme().to_string(), format!("//{host}{}", parsed.path())))
}

fn request_target(host: &str, path: &str) -> String {
    if path.is_empty() || path.starts_with('/') {
        format!("//{host}{path}")
    } else {
        format!("//{host}/{path}")
    }
}
