//! Tests for the provider URL sources.

use super::*;
use crate::error::Error;

mod github_tests {
    use super::*;

    #[test]
    fn provider_prefixes() {
        let source = GitHubSource::default();
        assert_eq!(
            source.provider_url_prefixes(Transport::Https).unwrap(),
            vec!["https://github.com/"]
        );
        assert_eq!(
            source.provider_url_prefixes(Transport::Ssh).unwrap(),
            vec!["git@github.com:", "ssh://git@github.com/"]
        );
    }

    #[test]
    fn organization_prefixes() {
        let source = GitHubSource::default();
        assert_eq!(
            source
                .organization_url_prefixes(Transport::Https, "acme")
                .unwrap(),
            vec!["https://github.com/acme/"]
        );
        assert_eq!(
            source
                .organization_url_prefixes(Transport::Ssh, "acme")
                .unwrap(),
            vec!["git@github.com:acme/", "ssh://git@github.com/acme/"]
        );
    }

    #[test]
    fn repository_urls_include_bare_spelling() {
        let source = GitHubSource::default();
        assert_eq!(
            source
                .repository_urls(Transport::Https, "acme/widgets")
                .unwrap(),
            vec![
                "https://github.com/acme/widgets.git",
                "https://github.com/acme/widgets"
            ]
        );
        assert_eq!(
            source.repository_urls(Transport::Ssh, "acme/widgets").unwrap(),
            vec![
                "git@github.com:acme/widgets.git",
                "git@github.com:acme/widgets",
                "ssh://git@github.com/acme/widgets.git",
                "ssh://git@github.com/acme/widgets",
            ]
        );
    }

    #[test]
    fn enterprise_server_with_trailing_slash() {
        let with = GitHubSource::new("https://ghe.example.com/");
        let without = GitHubSource::new("https://ghe.example.com");
        for transport in [Transport::Https, Transport::Ssh] {
            assert_eq!(
                with.repository_urls(transport, "acme/widgets").unwrap(),
                without.repository_urls(transport, "acme/widgets").unwrap()
            );
            assert_eq!(
                with.provider_url_prefixes(transport).unwrap(),
                without.provider_url_prefixes(transport).unwrap()
            );
        }
    }

    #[test]
    fn invalid_server_url() {
        let source = GitHubSource::new("::not-a-url");
        assert!(matches!(
            source.provider_url_prefixes(Transport::Https),
            Err(Error::UrlParse { .. })
        ));
    }
}

mod gitlab_tests {
    use super::*;

    #[test]
    fn nested_group_prefixes() {
        let source = GitLabSource::default();
        assert_eq!(
            source
                .organization_url_prefixes(Transport::Ssh, "acme/platform")
                .unwrap(),
            vec![
                "git@gitlab.com:acme/platform/",
                "ssh://git@gitlab.com/acme/platform/"
            ]
        );
    }

    #[test]
    fn self_managed_under_path() {
        let source = GitLabSource::new("https://example.com/gitlab");
        assert_eq!(
            source
                .repository_urls(Transport::Https, "acme/widgets")
                .unwrap(),
            vec![
                "https://example.com/gitlab/acme/widgets.git",
                "https://example.com/gitlab/acme/widgets"
            ]
        );
        assert_eq!(
            source.repository_urls(Transport::Ssh, "acme/widgets").unwrap()[0],
            "git@example.com:gitlab/acme/widgets.git"
        );
    }
}

mod bitbucket_tests {
    use super::*;

    #[test]
    fn repository_urls_only_git_suffix() {
        let source = BitbucketSource::default();
        assert_eq!(
            source
                .repository_urls(Transport::Https, "acme/widgets")
                .unwrap(),
            vec!["https://bitbucket.org/acme/widgets.git"]
        );
        assert_eq!(
            source.repository_urls(Transport::Ssh, "acme/widgets").unwrap(),
            vec![
                "git@bitbucket.org:acme/widgets.git",
                "ssh://git@bitbucket.org/acme/widgets.git"
            ]
        );
    }

    #[test]
    fn token_username() {
        assert_eq!(BitbucketSource::default().token_username(), "x-token-auth");
        assert_eq!(GitHubSource::default().token_username(), "x-access-token");
        assert_eq!(CustomSource::new().token_username(), "x-access-token");
    }

    #[test]
    fn datacenter_uses_server_url_for_credentials() {
        let source = BitbucketDatacenterSource::new("https://bitbucket.example.com");
        assert_eq!(
            source.credential_scope("https://bitbucket.example.com/acme/widgets.git"),
            "https://bitbucket.example.com"
        );
        assert_eq!(source.token_username(), "git");
        assert_eq!(
            source.provider_url_prefixes(Transport::Ssh).unwrap(),
            vec![
                "git@bitbucket.example.com:",
                "ssh://git@bitbucket.example.com/"
            ]
        );
    }
}

mod custom_tests {
    use super::*;

    #[test]
    fn wildcards_yield_nothing() {
        let source = CustomSource::new();
        assert!(
            source
                .provider_url_prefixes(Transport::Https)
                .unwrap()
                .is_empty()
        );
        assert!(
            source
                .organization_url_prefixes(Transport::Ssh, "acme")
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn matching_scheme_is_returned_unchanged() {
        let source = CustomSource::new();
        assert_eq!(
            source
                .repository_urls(Transport::Https, "https://git.example.com/acme/widgets")
                .unwrap(),
            vec!["https://git.example.com/acme/widgets"]
        );
        assert_eq!(
            source
                .repository_urls(Transport::Ssh, "ssh://git.example.com/acme/widgets")
                .unwrap(),
            vec!["ssh://git.example.com/acme/widgets"]
        );
        assert_eq!(
            source
                .repository_urls(Transport::Ssh, "git@git.example.com:acme/widgets.git")
                .unwrap(),
            vec!["git@git.example.com:acme/widgets.git"]
        );
    }

    #[test]
    fn ssh_url_cannot_become_https() {
        let err = CustomSource::new()
            .repository_urls(Transport::Https, "ssh://host/path")
            .unwrap_err();
        assert!(matches!(err, Error::UrlConversion { .. }));
        let message = err.to_string();
        assert!(message.contains("ssh://host/path"));
        assert!(message.contains("http(s)"));
    }

    #[test]
    fn https_url_cannot_become_ssh() {
        let err = CustomSource::new()
            .repository_urls(Transport::Ssh, "https://host/path")
            .unwrap_err();
        assert!(err.to_string().contains("into ssh form"));
    }
}

mod dispatch_tests {
    use super::*;

    #[test]
    fn urls_for_follows_pattern_scope() {
        let source = GitHubSource::default();
        assert_eq!(
            source
                .urls_for(Transport::Https, &RepositoryPattern::new("*/*"))
                .unwrap(),
            vec!["https://github.com/"]
        );
        assert_eq!(
            source
                .urls_for(Transport::Https, &RepositoryPattern::new("acme/*"))
                .unwrap(),
            vec!["https://github.com/acme/"]
        );
        assert_eq!(
            source
                .urls_for(Transport::Https, &RepositoryPattern::new("acme/widgets"))
                .unwrap()
                .len(),
            2
        );
    }
}
