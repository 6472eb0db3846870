use std::fmt;

use thiserror::Error;

/// Canonical identity of a repository: the hosting provider plus the
/// provider's own id. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RepositoryKey {
    provider: String,
    id: String,
}

impl RepositoryKey {
    pub fn new(provider: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            id: id.into(),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for RepositoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.id)
    }
}

/// Metadata facet populated from the code host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMetadata {
    pub owner: String,
    pub name: String,
    pub description: String,
    pub language: Option<String>,
    pub owner_type: String,
    pub owner_avatar_url: String,
}

/// Metadata facet populated from the platform backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlatformMetadata {
    pub sponsored: bool,
    pub favorite: bool,
    pub my_sponsored: bool,
    pub favorite_count: u32,
    pub expiration_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("attempted to merge repositories with mismatched keys ({left} vs {right})")]
    IdentityMismatch { left: String, right: String },
}

/// View filter categories, each a pure predicate over derived flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateFilter {
    #[default]
    All,
    Sponsored,
    Popular,
    Favorite,
    MySponsored,
}

/// One logical repository: a key plus up to two independently-arriving
/// metadata facets. A record may live for a while with only one facet
/// (a bare search hit, or a platform feed entry) and gain the other later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    key: RepositoryKey,
    source: Option<SourceMetadata>,
    platform: Option<PlatformMetadata>,
}

impl Repository {
    pub fn new(key: RepositoryKey) -> Self {
        Self {
            key,
            source: None,
            platform: None,
        }
    }

    pub fn from_source(key: RepositoryKey, source: SourceMetadata) -> Self {
        Self {
            key,
            source: Some(source),
            platform: None,
        }
    }

    pub fn from_platform(key: RepositoryKey, platform: PlatformMetadata) -> Self {
        Self {
            key,
            source: None,
            platform: Some(platform),
        }
    }

    pub fn key(&self) -> &RepositoryKey {
        &self.key
    }

    pub fn source(&self) -> Option<&SourceMetadata> {
        self.source.as_ref()
    }

    pub fn platform(&self) -> Option<&PlatformMetadata> {
        self.platform.as_ref()
    }

    pub fn set_source(&mut self, source: SourceMetadata) {
        self.source = Some(source);
    }

    pub fn set_platform(&mut self, platform: PlatformMetadata) {
        self.platform = Some(platform);
    }

    pub(crate) fn platform_mut(&mut self) -> Option<&mut PlatformMetadata> {
        self.platform.as_mut()
    }

    /// Merge `other` into `self`. Facets are replaced wholesale: a present
    /// facet on `other` overwrites ours, an absent one leaves ours alone.
    pub fn merge_in(&mut self, other: Repository) -> Result<(), MergeError> {
        if self.key != other.key {
            return Err(MergeError::IdentityMismatch {
                left: self.key.to_string(),
                right: other.key.to_string(),
            });
        }
        if let Some(source) = other.source {
            self.source = Some(source);
        }
        if let Some(platform) = other.platform {
            self.platform = Some(platform);
        }
        Ok(())
    }

    pub fn is_sponsored(&self) -> bool {
        self.platform.as_ref().is_some_and(|p| p.sponsored)
    }

    pub fn is_favorite(&self) -> bool {
        self.platform.as_ref().is_some_and(|p| p.favorite)
    }

    pub fn is_my_sponsored(&self) -> bool {
        self.platform.as_ref().is_some_and(|p| p.my_sponsored)
    }

    /// Derived, not stored: any favorited repository counts as popular.
    pub fn is_popular(&self) -> bool {
        self.favorite_count() > 0
    }

    pub fn favorite_count(&self) -> u32 {
        self.platform.as_ref().map_or(0, |p| p.favorite_count)
    }

    pub fn matches_filter(&self, filter: TemplateFilter) -> bool {
        match filter {
            TemplateFilter::All => true,
            TemplateFilter::Sponsored => self.is_sponsored(),
            TemplateFilter::Popular => self.is_popular(),
            TemplateFilter::Favorite => self.is_favorite(),
            TemplateFilter::MySponsored => self.is_my_sponsored(),
        }
    }
}
