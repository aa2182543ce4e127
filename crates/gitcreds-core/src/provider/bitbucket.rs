//! Bitbucket Cloud.

use crate::error::Result;
use crate::types::Transport;

use super::{BITBUCKET, DEFAULT_BITBUCKET_SERVER_URL, UrlSource, hosted};

#[derive(Debug, Clone)]
pub struct BitbucketSource {
    server_url: String,
}

impl BitbucketSource {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
        }
    }
}

impl Default for BitbucketSource {
    fn default() -> Self {
        Self::new(DEFAULT_BITBUCKET_SERVER_URL)
    }
}

impl UrlSource for BitbucketSource {
    fn id(&self) -> &'static str {
        BITBUCKET
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
        workspace: &str,
    ) -> Result<Vec<String>> {
        hosted::prefixes(&self.server_url, transport, &format!("{workspace}/"))
    }

    // Bitbucket rejects clone URLs without the .git suffix.
    fn repository_urls(&self, transport: Transport, repository: &str) -> Result<Vec<String>> {
        hosted::repository_urls(&self.server_url, transport, repository, false)
    }

    fn token_username(&self) -> &'static str {
        "x-token-auth"
    }
}
