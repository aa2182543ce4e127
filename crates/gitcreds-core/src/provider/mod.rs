//! URL sources for each supported SCM provider.
//!
//! A URL source turns a provider's base server URL plus a repository pattern
//! into the equivalent clone URLs for one transport family. Providers:
//! - GitHub and GitLab accept clone URLs with and without the `.git` suffix
//! - Bitbucket Cloud and Data Center only accept the `.git` form
//! - The custom provider takes full clone URLs and never rewrites them

mod bitbucket;
mod bitbucket_datacenter;
mod custom;
mod github;
mod gitlab;
mod hosted;
pub mod registry;

pub use bitbucket::BitbucketSource;
pub use bitbucket_datacenter::BitbucketDatacenterSource;
pub use custom::CustomSource;
pub use github::GitHubSource;
pub use gitlab::GitLabSource;
pub use registry::{ProviderRegistry, ServerUrls};

use crate::error::Result;
use crate::types::{PatternScope, RepositoryPattern, Transport};

pub const GITHUB: &str = "github";
pub const GITLAB: &str = "gitlab";
pub const BITBUCKET: &str = "bitbucket";
pub const BITBUCKET_DATACENTER: &str = "bitbucket-datacenter";
pub const CUSTOM: &str = "custom";

pub const DEFAULT_GITHUB_SERVER_URL: &str = "https://github.com";
pub const DEFAULT_GITLAB_SERVER_URL: &str = "https://gitlab.com";
pub const DEFAULT_BITBUCKET_SERVER_URL: &str = "https://bitbucket.org";

/// Trait for provider-specific clone URL derivation.
///
/// Every list returned is ordered: the first entry is the form Git should
/// prefer, the rest are equivalent spellings.
pub trait UrlSource: Send + Sync + std::fmt::Debug {
    /// Provider identifier as accepted on the command line.
    fn id(&self) -> &'static str;

    /// Base server URL, if the provider has one.
    fn server_url(&self) -> Option<&str>;

    /// URLs covering every repository on the provider.
    fn provider_url_prefixes(&self, transport: Transport) -> Result<Vec<String>>;

    /// URLs covering every repository in one organization.
    fn organization_url_prefixes(&self, transport: Transport, org: &str) -> Result<Vec<String>>;

    /// URLs for cloning a single repository.
    fn repository_urls(&self, transport: Transport, repository: &str) -> Result<Vec<String>>;

    /// HTTP username to pair with an access token.
    fn token_username(&self) -> &'static str {
        "x-access-token"
    }

    /// URL under which the `credential.<url>.helper` entry is written for a
    /// canonical clone URL.
    fn credential_scope(&self, canonical: &str) -> String {
        canonical.to_string()
    }

    /// Dispatch on the pattern's scope.
    fn urls_for(&self, transport: Transport, pattern: &RepositoryPattern) -> Result<Vec<String>> {
        match pattern.scope() {
            PatternScope::Provider => self.provider_url_prefixes(transport),
            PatternScope::Organization(org) => self.organization_url_prefixes(transport, org),
            PatternScope::Repository(repository) => self.repository_urls(transport, repository),
        }
    }
}

#[cfg(test)]
mod tests;
