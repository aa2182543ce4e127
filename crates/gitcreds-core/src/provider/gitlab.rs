//! GitLab (gitlab.com and self-managed instances).

use crate::error::Result;
use crate::types::Transport;

use super::{DEFAULT_GITLAB_SERVER_URL, GITLAB, UrlSource, hosted};

#[derive(Debug, Clone)]
pub struct GitLabSource {
    server_url: String,
}

impl GitLabSource {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
        }
    }
}

impl Default for GitLabSource {
    fn default() -> Self {
        Self::new(DEFAULT_GITLAB_SERVER_URL)
    }
}

impl UrlSource for GitLabSource {
    fn id(&self) -> &'static str {
        GITLAB
    }

    fn server_url(&self) -> Option<&str> {
        Some(&self.server_url)
    }

    fn provider_url_prefixes(&self, transport: Transport) -> Result<Vec<String>> {
        hosted::prefixes(&self.server_url, transport, "/")
    }

    fn organization_url_prefixes(&self, transport: Transport, group: &str) -> Result<Vec<String>> {
        hosted::prefixes(&self.server_url, transport, &format!("{group}/"))
    }

    fn repository_urls(&self, transport: Transport, repository: &str) -> Result<Vec<String>> {
        hosted::repository_urls(&self.server_url, transport, repository, true)
    }
}
