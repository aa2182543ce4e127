//! Tests for alias resolution.

use std::collections::BTreeSet;

use super::*;
use crate::provider::{
    BitbucketDatacenterSource, BitbucketSource, CustomSource, GitHubSource, GitLabSource,
};

fn patterns(raw: &str) -> Vec<RepositoryPattern> {
    RepositoryPattern::parse_list(raw)
}

fn all_urls(mapping: &AliasMapping) -> BTreeSet<String> {
    mapping
        .iter()
        .flat_map(|e| std::iter::once(e.canonical.clone()).chain(e.aliases.iter().cloned()))
        .collect()
}

mod scenario_tests {
    use super::*;

    #[test]
    fn github_whole_provider_over_https() {
        let mapping = resolve(&GitHubSource::default(), &patterns("*/*"), Transport::Https).unwrap();

        assert_eq!(mapping.len(), 1);
        assert_eq!(
            mapping.get("https://github.com/").unwrap(),
            ["git@github.com:", "ssh://git@github.com/"]
        );
    }

    #[test]
    fn github_single_repository_over_ssh() {
        let mapping =
            resolve(&GitHubSource::default(), &patterns("example/foo"), Transport::Ssh).unwrap();

        let aliases = mapping.get("git@github.com:example/foo.git").unwrap();
        assert_eq!(
            aliases,
            [
                "git@github.com:example/foo",
                "ssh://git@github.com/example/foo.git",
                "ssh://git@github.com/example/foo",
                "https://github.com/example/foo.git",
                "https://github.com/example/foo",
            ]
        );
    }

    #[test]
    fn organization_over_https() {
        let mapping = resolve(&GitLabSource::default(), &patterns("acme/*"), Transport::Https).unwrap();

        assert_eq!(
            mapping.get("https://gitlab.com/acme/").unwrap(),
            ["git@gitlab.com:acme/", "ssh://git@gitlab.com/acme/"]
        );
    }

    #[test]
    fn empty_pattern_list_is_empty_mapping() {
        let mapping = resolve(&GitHubSource::default(), &[], Transport::Ssh).unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn multiple_patterns_keep_order() {
        let mapping = resolve(
            &GitHubSource::default(),
            &patterns("acme/*, other/tool"),
            Transport::Https,
        )
        .unwrap();

        let canonical: Vec<_> = mapping.canonical_urls().collect();
        assert_eq!(
            canonical,
            vec!["https://github.com/acme/", "https://github.com/other/tool.git"]
        );
    }

    #[test]
    fn repeated_pattern_does_not_duplicate_aliases() {
        let mapping = resolve(
            &GitHubSource::default(),
            &patterns("acme/* acme/*"),
            Transport::Https,
        )
        .unwrap();

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("https://github.com/acme/").unwrap().len(), 2);
    }
}

mod symmetry_tests {
    use super::*;

    fn assert_symmetric(source: &dyn UrlSource, raw: &str) {
        let pattern = patterns(raw);
        let ssh = resolve(source, &pattern, Transport::Ssh).unwrap();
        let https = resolve(source, &pattern, Transport::Https).unwrap();

        assert_eq!(all_urls(&ssh), all_urls(&https), "{} {raw}", source.id());

        for entry in &ssh {
            let other: BTreeSet<_> = https.iter().flat_map(|e| e.aliases.iter()).collect();
            assert!(other.contains(&entry.canonical), "{} {raw}", source.id());
        }
        for entry in &https {
            let other: BTreeSet<_> = ssh.iter().flat_map(|e| e.aliases.iter()).collect();
            assert!(other.contains(&entry.canonical), "{} {raw}", source.id());
        }
    }

    #[test]
    fn ssh_and_https_cover_the_same_urls() {
        let sources: Vec<Box<dyn UrlSource>> = vec![
            Box::new(GitHubSource::default()),
            Box::new(GitLabSource::new("https://gitlab.example.com/")),
            Box::new(BitbucketSource::default()),
            Box::new(BitbucketDatacenterSource::new("https://bitbucket.example.com")),
        ];

        for source in &sources {
            for raw in ["*/*", "acme/*", "acme/widgets"] {
                assert_symmetric(source.as_ref(), raw);
            }
        }
    }
}

mod custom_tests {
    use super::*;

    #[test]
    fn custom_wildcards_are_skipped() {
        let mapping = resolve(&CustomSource::new(), &patterns("*/* acme/*"), Transport::Https).unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn custom_repository_without_alternates() {
        let mapping = resolve(
            &CustomSource::new(),
            &patterns("ssh://git.example.com/acme/widgets"),
            Transport::Ssh,
        )
        .unwrap();

        assert_eq!(
            mapping.get("ssh://git.example.com/acme/widgets").unwrap(),
            Vec::<String>::new().as_slice()
        );
    }

    #[test]
    fn custom_repository_in_wrong_transport_fails() {
        let err = resolve(
            &CustomSource::new(),
            &patterns("https://git.example.com/ok ssh://host/path"),
            Transport::Https,
        )
        .unwrap_err();

        assert!(matches!(err, Error::UrlConversion { .. }));
        assert!(err.to_string().contains("ssh://host/path"));
    }
}

mod mapping_tests {
    use super::*;

    #[test]
    fn insert_accumulates_without_duplicates() {
        let mut mapping = AliasMapping::new();
        mapping.insert("a", vec!["x".to_string(), "y".to_string()]);
        mapping.insert("b", vec!["z".to_string()]);
        mapping.insert("a", vec!["y".to_string(), "w".to_string()]);

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("a").unwrap(), ["x", "y", "w"]);
        assert_eq!(mapping.get("b").unwrap(), ["z"]);
        assert!(mapping.get("c").is_none());
    }
}
