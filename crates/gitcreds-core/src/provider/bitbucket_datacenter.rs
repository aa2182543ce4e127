//! Bitbucket Data Center (self-hosted Bitbucket Server).
//!
//! The SSH port of a Data Center instance is only discoverable through its
//! REST API, which this tool does not call. Both SSH spellings are emitted on
//! the default port.

use crate::error::Result;
use crate::types::Transport;

use super::{BITBUCKET_DATACENTER, UrlSource, hosted};

#[derive(Debug, Clone)]
pub struct BitbucketDatacenterSource {
    server_url: String,
}

impl BitbucketDatacenterSource {
    /// Data Center has no public default, the server URL is mandatory.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
        }
    }
}

impl UrlSource for BitbucketDatacenterSource {
    fn id(&self) -> &'static str {
        BITBUCKET_DATACENTER
    }

    fn server_url(&self) -> Option<&str> {
        Some(&self.server_url)
    }

    fn provider_url_prefixes(&self, transport: Transport) -> Result<Vec<String>> {
        hosted::prefixes(&self.server_url, transport, "/")
    }

    fn organization_url_prefixes(
        &self,
        transport: Transport,
        project: &str,
    ) -> Result<Vec<String>> {
        hosted::prefixes(&self.server_url, transport, &format!("{project}/"))
    }

    fn repository_urls(&self, transport: Transport, repository: &str) -> Result<Vec<String>> {
        hosted::repository_urls(&self.server_url, transport, repository, false)
    }

    fn token_username(&self) -> &'static str {
        "git"
    }

    /// One helper entry for the whole server rather than per clone URL.
    fn credential_scope(&self, _canonical: &str) -> String {
        self.server_url.clone()
    }
}
