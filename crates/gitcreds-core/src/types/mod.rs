//! Shared core types used by the provider, alias and configure layers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Transport family Git should use for the configured repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// `https://` (or `http://`) clone URLs.
    Https,
    /// `git@host:` and `ssh://git@host/` clone URLs.
    Ssh,
}

impl Transport {
    pub fn from_ssh(ssh: bool) -> Self {
        if ssh { Self::Ssh } else { Self::Https }
    }

    pub fn is_ssh(self) -> bool {
        self == Self::Ssh
    }

    /// The other transport family.
    pub fn flip(self) -> Self {
        match self {
            Self::Https => Self::Ssh,
            Self::Ssh => Self::Https,
        }
    }

    /// Name used when reporting conversion failures.
    pub fn target_name(self) -> &'static str {
        match self {
            Self::Https => "http(s)",
            Self::Ssh => "ssh",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target_name())
    }
}

/// What a repository pattern covers on the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternScope<'a> {
    /// `*/*`
    Provider,
    /// `org/*`
    Organization(&'a str),
    /// `org/repo`, or a full clone URL for the custom provider
    Repository(&'a str),
}

/// A single entry of the repositories input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryPattern(String);

impl RepositoryPattern {
    pub const ALL: &'static str = "*/*";

    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify the pattern. Purely syntactic: `*/*` is the whole provider,
    /// a `/*` suffix is an organization, anything else is one repository.
    pub fn scope(&self) -> PatternScope<'_> {
        if self.0 == Self::ALL {
            PatternScope::Provider
        } else if let Some(org) = self.0.strip_suffix("/*") {
            PatternScope::Organization(org)
        } else {
            PatternScope::Repository(&self.0)
        }
    }

    /// Split a whitespace and/or comma separated list into patterns.
    pub fn parse_list(input: &str) -> Vec<Self> {
        input
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(Self::new)
            .collect()
    }
}

impl fmt::Display for RepositoryPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_classification() {
        assert_eq!(RepositoryPattern::new("*/*").scope(), PatternScope::Provider);
        assert_eq!(
            RepositoryPattern::new("acme/*").scope(),
            PatternScope::Organization("acme")
        );
        assert_eq!(
            RepositoryPattern::new("acme/widgets").scope(),
            PatternScope::Repository("acme/widgets")
        );
        // only the exact string counts as the whole provider
        assert_eq!(
            RepositoryPattern::new("*/*/").scope(),
            PatternScope::Repository("*/*/")
        );
    }

    #[test]
    fn parse_list_accepts_commas_and_whitespace() {
        let patterns = RepositoryPattern::parse_list(" acme/one,acme/two\n\tother/*  ,, ");
        let raw: Vec<_> = patterns.iter().map(|p| p.as_str()).collect();
        assert_eq!(raw, vec!["acme/one", "acme/two", "other/*"]);
    }

    #[test]
    fn parse_list_empty() {
        assert!(RepositoryPattern::parse_list("  \n ,").is_empty());
    }

    #[test]
    fn transport_flip_and_names() {
        assert_eq!(Transport::Ssh.flip(), Transport::Https);
        assert_eq!(Transport::Https.flip(), Transport::Ssh);
        assert_eq!(Transport::Https.to_string(), "http(s)");
        assert_eq!(Transport::from_ssh(true), Transport::Ssh);
    }
}
