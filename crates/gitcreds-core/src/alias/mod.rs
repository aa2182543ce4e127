//! Alias resolution: which clone URL Git should use, and which spellings it
//! should rewrite into it.

use tracing::debug;

use crate::error::{Error, Result};
use crate::provider::UrlSource;
use crate::types::{RepositoryPattern, Transport};

/// One canonical URL and the spellings rewritten into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub canonical: String,
    pub aliases: Vec<String>,
}

/// Ordered mapping from canonical URL to alias URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMapping {
    entries: Vec<AliasEntry>,
}

impl AliasMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add aliases for a canonical URL, merging with any earlier entry.
    /// Aliases the entry already holds are skipped.
    pub fn insert(&mut self, canonical: impl Into<String>, aliases: Vec<String>) {
        let canonical = canonical.into();
        let index = match self.entries.iter().position(|e| e.canonical == canonical) {
            Some(index) => index,
            None => {
                self.entries.push(AliasEntry {
                    canonical,
                    aliases: Vec::new(),
                });
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[index];
        for alias in aliases {
            if !entry.aliases.contains(&alias) {
                entry.aliases.push(alias);
            }
        }
    }

    pub fn get(&self, canonical: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.canonical == canonical)
            .map(|e| e.aliases.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &AliasEntry> {
        self.entries.iter()
    }

    pub fn canonical_urls(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.canonical.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a AliasMapping {
    type Item = &'a AliasEntry;
    type IntoIter = std::slice::Iter<'a, AliasEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Compute the alias mapping for every pattern.
///
/// The first URL in the wanted transport is canonical; the remaining wanted
/// spellings and every spelling in the other transport become its aliases.
/// Any error aborts the whole resolution.
pub fn resolve(
    source: &dyn UrlSource,
    patterns: &[RepositoryPattern],
    transport: Transport,
) -> Result<AliasMapping> {
    let mut mapping = AliasMapping::new();

    for pattern in patterns {
        let mut preferred = source.urls_for(transport, pattern)?.into_iter();
        let alternate = alternate_urls(source, transport.flip(), pattern)?;

        let Some(canonical) = preferred.next() else {
            debug!(pattern = %pattern, provider = source.id(), "pattern yields no clone URLs");
            continue;
        };

        let aliases: Vec<String> = preferred.chain(alternate).collect();
        debug!(pattern = %pattern, canonical = %canonical, aliases = aliases.len(), "resolved pattern");
        mapping.insert(canonical, aliases);
    }

    Ok(mapping)
}

/// A URL with no spelling in the other transport simply has no alternates.
fn alternate_urls(
    source: &dyn UrlSource,
    transport: Transport,
    pattern: &RepositoryPattern,
) -> Result<Vec<String>> {
    match source.urls_for(transport, pattern) {
        Ok(urls) => Ok(urls),
        Err(Error::UrlConversion { .. }) => Ok(Vec::new()),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests;
