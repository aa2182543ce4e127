//! GitHub (github.com and GitHub Enterprise Server).

use crate::error::Result;
use crate::types::Transport;

use super::{DEFAULT_GITHUB_SERVER_URL, GITHUB, UrlSource, hosted};

#[derive(Debug, Clone)]
pub struct GitHubSource {
    server_url: String,
}

impl GitHubSource {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
        }
    }
}

impl Default for GitHubSource {
    fn default() -> Self {
        Self::new(DEFAULT_GITHUB_SERVER_URL)
    }
}

impl UrlSource for GitHubSource {
    fn id(&self) -> &'static str {
        GITHUB
    }

    fn server_url(&self) -> Option<&str> {
        Some(&self.server_url)
    }

    fn provider_url_prefixes(&self, transport: Transport) -> Result<Vec<String>> {
        hosted::prefixes(&self.server_url, transport, "/")
    }

    fn organization_url_prefixes(&self, transport: Transport, org: &str) -> Result<Vec<String>> {
        hosted::prefixes(&self.server_url, transport, &format!("{org}/"))
    }

    fn repository_urls(&self, transport: Transport, repository: &str) -> Result<Vec<String>> {
        hosted::repository_urls(&self.server_url, transport, repository, true)
    }
}
