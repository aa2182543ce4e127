//! Custom provider: repositories are given as complete clone URLs.

use url::Url;

use crate::error::{Error, Result};
use crate::types::Transport;

use super::{CUSTOM, UrlSource};

#[derive(Debug, Clone, Default)]
pub struct CustomSource;

impl CustomSource {
    pub fn new() -> Self {
        Self
    }
}

impl UrlSource for CustomSource {
    fn id(&self) -> &'static str {
        CUSTOM
    }

    fn server_url(&self) -> Option<&str> {
        None
    }

    /// Wildcards cannot be expanded without knowing the server layout.
    fn provider_url_prefixes(&self, _transport: Transport) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn organization_url_prefixes(&self, _transport: Transport, _org: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    /// The URL is returned unchanged when its scheme already belongs to the
    /// requested transport family. Scheme-less strings such as
    /// `git@host:org/repo` count as SSH.
    fn repository_urls(&self, transport: Transport, repository: &str) -> Result<Vec<String>> {
        let is_http = match Url::parse(repository) {
            Ok(url) => matches!(url.scheme(), "http" | "https"),
            Err(url::ParseError::RelativeUrlWithoutBase) => false,
            Err(source) => {
                return Err(Error::UrlParse {
                    url: repository.to_string(),
                    source,
                });
            }
        };

        if is_http == transport.is_ssh() {
            return Err(Error::UrlConversion {
                url: repository.to_string(),
                target: transport.target_name(),
            });
        }
        Ok(vec![repository.to_string()])
    }
}
