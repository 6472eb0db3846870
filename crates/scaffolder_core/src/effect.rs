use std::fmt;

use crate::RepositoryKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Popular,
    Sponsored,
    Favorites,
    MySponsored,
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedKind::Popular => write!(f, "popular"),
            FeedKind::Sponsored => write!(f, "sponsored"),
            FeedKind::Favorites => write!(f, "favorites"),
            FeedKind::MySponsored => write!(f, "my-sponsored"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchFeed {
        feed: FeedKind,
    },
    SearchTemplates {
        query: String,
    },
    FetchSourceMetadata {
        key: RepositoryKey,
    },
    FetchPlatformMetadata {
        key: RepositoryKey,
    },
    AddFavorite {
        key: RepositoryKey,
    },
    RemoveFavorite {
        key: RepositoryKey,
    },
    Sponsor {
        key: RepositoryKey,
    },
    CancelSponsorship {
        key: RepositoryKey,
    },
    /// Launch the replacement-key discovery job for a template.
    DiscoverKeys {
        repository_owner: String,
        repository_name: String,
    },
    /// Launch the repository-creation job.
    CreateRepository {
        template_owner: String,
        template_name: String,
        destination_owner: String,
        destination_name: String,
        replacements: Vec<(String, String)>,
    },
    /// Resolve the authenticated identity's code-host login.
    FetchViewerLogin,
}
