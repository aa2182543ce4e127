//! Provider registry for looking up URL sources by identifier.
//!
//! The registry is built from the configured server URLs so every source it
//! hands out is ready to derive clone URLs.

use super::{
    BitbucketDatacenterSource, BitbucketSource, CustomSource, DEFAULT_BITBUCKET_SERVER_URL,
    DEFAULT_GITHUB_SERVER_URL, DEFAULT_GITLAB_SERVER_URL, GitHubSource, GitLabSource, UrlSource,
};

/// Base server URLs for the hosted providers.
///
/// Bitbucket Cloud and Data Center share one input; Cloud falls back to
/// bitbucket.org, Data Center has no fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerUrls {
    pub github: Option<String>,
    pub gitlab: Option<String>,
    pub bitbucket: Option<String>,
}

/// Registry of available URL sources.
#[derive(Debug)]
pub struct ProviderRegistry {
    sources: Vec<Box<dyn UrlSource>>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_server_urls(&ServerUrls::default())
    }
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Create a registry holding every built-in provider.
    pub fn with_server_urls(urls: &ServerUrls) -> Self {
        let bitbucket = urls.bitbucket.clone();
        let mut registry = Self::new();
        registry.register(Box::new(GitHubSource::new(
            urls.github.as_deref().unwrap_or(DEFAULT_GITHUB_SERVER_URL),
        )));
        registry.register(Box::new(GitLabSource::new(
            urls.gitlab.as_deref().unwrap_or(DEFAULT_GITLAB_SERVER_URL),
        )));
        registry.register(Box::new(BitbucketSource::new(
            bitbucket.as_deref().unwrap_or(DEFAULT_BITBUCKET_SERVER_URL),
        )));
        registry.register(Box::new(BitbucketDatacenterSource::new(
            bitbucket.unwrap_or_default(),
        )));
        registry.register(Box::new(CustomSource::new()));
        registry
    }

    /// Register a URL source. A later source with an id already present is
    /// never returned by [`get`](Self::get).
    pub fn register(&mut self, source: Box<dyn UrlSource>) {
        self.sources.push(source);
    }

    /// Look up a source by identifier, ignoring case and surrounding space.
    pub fn get(&self, id: &str) -> Option<&dyn UrlSource> {
        let id = id.trim();
        self.sources
            .iter()
            .find(|s| s.id().eq_ignore_ascii_case(id))
            .map(|s| s.as_ref())
    }

    pub fn provider_ids(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Transport;

    #[test]
    fn test_default_providers_registered() {
        let registry = ProviderRegistry::default();
        let ids = registry.provider_ids();

        assert_eq!(
            ids,
            vec!["github", "gitlab", "bitbucket", "bitbucket-datacenter", "custom"]
        );
    }

    #[test]
    fn test_get_is_case_insensitive() {
        let registry = ProviderRegistry::default();

        assert_eq!(registry.get("GitHub").expect("exists").id(), "github");
        assert_eq!(registry.get(" gitlab ").expect("exists").id(), "gitlab");
        assert!(registry.get("sourcehut").is_none());
    }

    #[test]
    fn test_server_urls_are_applied() {
        let registry = ProviderRegistry::with_server_urls(&ServerUrls {
            github: Some("https://ghe.example.com".to_string()),
            gitlab: None,
            bitbucket: Some("https://bitbucket.example.com".to_string()),
        });

        assert_eq!(
            registry.get("github").and_then(|s| s.server_url()),
            Some("https://ghe.example.com")
        );
        assert_eq!(
            registry.get("gitlab").and_then(|s| s.server_url()),
            Some(DEFAULT_GITLAB_SERVER_URL)
        );
        assert_eq!(
            registry.get("bitbucket-datacenter").and_then(|s| s.server_url()),
            Some("https://bitbucket.example.com")
        );
        assert_eq!(registry.get("custom").and_then(|s| s.server_url()), None);
    }

    #[test]
    fn test_datacenter_without_server_url_fails_to_derive() {
        let registry = ProviderRegistry::default();
        let dc = registry.get("bitbucket-datacenter").expect("exists");

        assert!(dc.provider_url_prefixes(Transport::Https).is_err());
    }

    #[test]
    fn test_register_custom_source() {
        let mut registry = ProviderRegistry::new();
        assert!(registry.provider_ids().is_empty());

        registry.register(Box::new(GitHubSource::default()));
        registry.register(Box::new(GitHubSource::new("https://ghe.example.com")));
        assert_eq!(registry.provider_ids(), ["github", "github"]);
        assert_eq!(
            registry.get("github").and_then(|s| s.server_url()),
            Some(DEFAULT_GITHUB_SERVER_URL)
        );
        assert!(registry.get("gitlab").is_none());
    }
}
