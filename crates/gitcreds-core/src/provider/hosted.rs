//! URL derivation shared by the providers that live on a single server.

use url::Url;

use crate::error::{Error, Result};
use crate::types::Transport;

/// A parsed provider base URL.
#[derive(Debug, Clone)]
pub(crate) struct BaseUrl(Url);

impl BaseUrl {
    pub(crate) fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw).map_err(|source| Error::UrlParse {
            url: raw.to_string(),
            source,
        })?;
        if url.host_str().is_none_or(str::is_empty) {
            return Err(Error::UrlParse {
                url: raw.to_string(),
                source: url::ParseError::EmptyHost,
            });
        }
        Ok(Self(url))
    }

    /// Join a relative element onto the base path.
    ///
    /// Empty and `.` segments are dropped and `..` pops, so the result does not
    /// depend on whether the base URL ends with a slash. A trailing slash on
    /// `elem` is kept.
    pub(crate) fn join(&self, elem: &str) -> Url {
        let mut segments: Vec<&str> = Vec::new();
        for segment in self.0.path().split('/').chain(elem.split('/')) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }

        let mut path = format!("/{}", segments.join("/"));
        if elem.ends_with('/') && !path.ends_with('/') {
            path.push('/');
        }

        let mut joined = self.0.clone();
        joined.set_path(&path);
        joined.set_query(None);
        joined.set_fragment(None);
        joined
    }
}

/// `git@host:path`
pub(crate) fn scp_form(url: &Url) -> String {
    format!("git@{}:{}", host(url), url.path().trim_start_matches('/'))
}

/// `ssh://git@host/path`
pub(crate) fn ssh_form(url: &Url) -> String {
    format!("ssh://git@{}/{}", host(url), url.path().trim_start_matches('/'))
}

fn host(url: &Url) -> &str {
    url.host_str().unwrap_or_default()
}

/// Prefixes for a whole-provider (`elem == "/"`) or organization
/// (`elem == "org/"`) scope.
pub(crate) fn prefixes(base: &str, transport: Transport, elem: &str) -> Result<Vec<String>> {
    let joined = BaseUrl::parse(base)?.join(elem);
    Ok(match transport {
        Transport::Https => vec![joined.to_string()],
        Transport::Ssh => vec![scp_form(&joined), ssh_form(&joined)],
    })
}

/// Clone URLs for one repository. `accepts_bare` adds the spelling without
/// the `.git` suffix after each `.git` form.
pub(crate) fn repository_urls(
    base: &str,
    transport: Transport,
    repository: &str,
    accepts_bare: bool,
) -> Result<Vec<String>> {
    let base = BaseUrl::parse(base)?;
    let preferred = base.join(&format!("{repository}.git"));
    let accepted = accepts_bare.then(|| base.join(repository));

    let mut urls = Vec::new();
    match transport {
        Transport::Https => {
            urls.push(preferred.to_string());
            urls.extend(accepted.iter().map(Url::to_string));
        }
        Transport::Ssh => {
            urls.push(scp_form(&preferred));
            urls.extend(accepted.iter().map(scp_form));
            urls.push(ssh_form(&preferred));
            urls.extend(accepted.iter().map(ssh_form));
        }
    }
    Ok(urls)
}
