use std::collections::BTreeMap;

use crate::{Effect, MergeError, PlatformMetadata, Repository, RepositoryKey, SourceMetadata};

/// Keyed store of repository records; exactly one logical record per
/// `(provider, id)` no matter how many overlapping feeds mention it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepositoryCollection {
    repositories: BTreeMap<String, Repository>,
}

impl RepositoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    pub fn get(&self, key: &RepositoryKey) -> Option<&Repository> {
        self.repositories.get(&key.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Repository> {
        self.repositories.values()
    }

    /// Insert or merge a record. For each facet still absent afterwards the
    /// caller gets a fetch effect so the record fills in asynchronously.
    pub fn add(&mut self, repository: Repository) -> Result<Vec<Effect>, MergeError> {
        let map_key = repository.key().to_string();
        let merged = match self.repositories.remove(&map_key) {
            Some(mut existing) => {
                existing.merge_in(repository)?;
                existing
            }
            None => repository,
        };

        let mut effects = Vec::new();
        if merged.source().is_none() {
            effects.push(Effect::FetchSourceMetadata {
                key: merged.key().clone(),
            });
        }
        if merged.platform().is_none() {
            effects.push(Effect::FetchPlatformMetadata {
                key: merged.key().clone(),
            });
        }
        self.repositories.insert(map_key, merged);
        Ok(effects)
    }

    pub fn add_many(
        &mut self,
        repositories: impl IntoIterator<Item = Repository>,
    ) -> Result<Vec<Effect>, MergeError> {
        let mut effects = Vec::new();
        for repository in repositories {
            effects.extend(self.add(repository)?);
        }
        Ok(effects)
    }

    pub fn apply_source_metadata(&mut self, key: &RepositoryKey, metadata: SourceMetadata) {
        if let Some(repository) = self.repositories.get_mut(&key.to_string()) {
            repository.set_source(metadata);
        }
    }

    pub fn apply_platform_metadata(&mut self, key: &RepositoryKey, metadata: PlatformMetadata) {
        if let Some(repository) = self.repositories.get_mut(&key.to_string()) {
            repository.set_platform(metadata);
        }
    }

    /// Drop records with no platform facet. A record that never gained one
    /// was a pure search hit; a fresh search supersedes it.
    pub fn clear_search_only(&mut self) {
        self.repositories
            .retain(|_, repository| repository.platform().is_some());
    }

    /// Clear the favorite flag everywhere; the authoritative favorites set
    /// is about to be merged back in.
    pub fn clear_favorites(&mut self) {
        for repository in self.repositories.values_mut() {
            if let Some(platform) = repository.platform_mut() {
                platform.favorite = false;
            }
        }
    }

    /// Clear the sponsored flag everywhere, mirroring `clear_favorites`.
    pub fn clear_sponsored(&mut self) {
        for repository in self.repositories.values_mut() {
            if let Some(platform) = repository.platform_mut() {
                platform.sponsored = false;
            }
        }
    }

    pub fn clear_my_sponsorship(&mut self, key: &RepositoryKey) {
        if let Some(repository) = self.repositories.get_mut(&key.to_string()) {
            if let Some(platform) = repository.platform_mut() {
                platform.my_sponsored = false;
            }
        }
    }
}
