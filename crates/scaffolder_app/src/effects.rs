//! Mapping between the core's effects/messages and the engine's
//! commands/events, including wire-model to record conversion.

use scaffolder_core::{
    Effect, FeedKind, Msg, PlatformMetadata, Repository, RepositoryKey, SourceMetadata,
};
use scaffolder_engine::{
    EngineCommand, EngineEvent, EngineHandle, PlatformRepository, SourceRepository,
};

/// Provider slug assigned to records arriving from the code host.
const SOURCE_PROVIDER: &str = "GitHub";

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.engine.enqueue(map_effect(effect));
        }
    }

    pub fn try_recv(&self) -> Option<Msg> {
        self.engine.try_recv().map(map_event)
    }
}

fn map_effect(effect: Effect) -> EngineCommand {
    match effect {
        Effect::FetchFeed { feed } => EngineCommand::FetchFeed {
            feed: feed_to_engine(feed),
        },
        Effect::SearchTemplates { query } => EngineCommand::Search { query },
        Effect::FetchSourceMetadata { key } => EngineCommand::FetchSourceMetadata {
            provider: key.provider().to_string(),
            id: key.id().to_string(),
        },
        Effect::FetchPlatformMetadata { key } => EngineCommand::FetchPlatformMetadata {
            provider: key.provider().to_string(),
            id: key.id().to_string(),
        },
        Effect::AddFavorite { key } => EngineCommand::AddFavorite {
            provider: key.provider().to_string(),
            id: key.id().to_string(),
        },
        Effect::RemoveFavorite { key } => EngineCommand::RemoveFavorite {
            provider: key.provider().to_string(),
            id: key.id().to_string(),
        },
        Effect::Sponsor { key } => EngineCommand::Sponsor {
            provider: key.provider().to_string(),
            id: key.id().to_string(),
        },
        Effect::CancelSponsorship { key } => EngineCommand::CancelSponsorship {
            provider: key.provider().to_string(),
            id: key.id().to_string(),
        },
        Effect::DiscoverKeys {
            repository_owner,
            repository_name,
        } => EngineCommand::DiscoverKeys {
            repository_owner,
            repository_name,
        },
        Effect::CreateRepository {
            template_owner,
            template_name,
            destination_owner,
            destination_name,
            replacements,
        } => EngineCommand::CreateRepository {
            template_owner,
            template_name,
            destination_owner,
            destination_name,
            replacements,
        },
        Effect::FetchViewerLogin => EngineCommand::FetchViewerLogin,
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::FeedLoaded { feed, result } => {
            let feed = feed_to_core(feed);
            match result {
                Ok(wire) => Msg::FeedLoaded {
                    feed,
                    repositories: wire.into_iter().map(platform_to_record).collect(),
                },
                Err(err) => Msg::FeedFailed {
                    feed,
                    message: err.to_string(),
                },
            }
        }
        EngineEvent::SearchCompleted { result } => match result {
            Ok(items) => Msg::SearchLoaded {
                repositories: items.into_iter().map(source_to_record).collect(),
            },
            Err(err) => Msg::SearchFailed {
                message: err.to_string(),
            },
        },
        EngineEvent::SourceMetadataFetched {
            provider,
            id,
            result,
        } => {
            let key = RepositoryKey::new(provider, id);
            match result {
                Ok(wire) => Msg::SourceMetadataLoaded {
                    key,
                    metadata: source_to_metadata(wire),
                },
                Err(err) => Msg::MetadataFetchFailed {
                    key,
                    message: err.to_string(),
                },
            }
        }
        EngineEvent::PlatformMetadataFetched {
            provider,
            id,
            result,
        } => {
            let key = RepositoryKey::new(provider, id);
            match result {
                Ok(wire) => Msg::PlatformMetadataLoaded {
                    key,
                    metadata: wire.map(platform_to_metadata),
                },
                Err(err) => Msg::MetadataFetchFailed {
                    key,
                    message: err.to_string(),
                },
            }
        }
        EngineEvent::FavoritesUpdated { result } => match result {
            Ok(wire) => Msg::FavoritesChanged {
                repositories: wire.into_iter().map(platform_to_record).collect(),
            },
            Err(err) => Msg::PlatformActionFailed {
                message: err.to_string(),
            },
        },
        EngineEvent::SponsoredUpdated { result } => match result {
            Ok(wire) => Msg::SponsoredChanged {
                repositories: wire.into_iter().map(platform_to_record).collect(),
            },
            Err(err) => Msg::PlatformActionFailed {
                message: err.to_string(),
            },
        },
        EngineEvent::SponsorshipCancelled {
            provider,
            id,
            result,
        } => {
            let key = RepositoryKey::new(provider, id);
            match result {
                Ok(()) => Msg::SponsorshipCancelled { key },
                Err(err) => Msg::PlatformActionFailed {
                    message: err.to_string(),
                },
            }
        }
        EngineEvent::KeysDiscovered { result } => match result {
            Ok(keys) => Msg::KeysDiscovered { keys },
            Err(err) => Msg::KeyDiscoveryFailed {
                message: err.to_string(),
            },
        },
        EngineEvent::RepositoryCreated { result } => match result {
            Ok(url) => Msg::RepositoryCreated { url },
            Err(err) => Msg::CreationFailed {
                message: err.to_string(),
            },
        },
        EngineEvent::ViewerLoginResolved { result } => match result {
            Ok(login) => Msg::ViewerLoginLoaded { login },
            Err(err) => Msg::ViewerLoginFailed {
                message: err.to_string(),
            },
        },
    }
}

fn feed_to_engine(feed: FeedKind) -> scaffolder_engine::FeedKind {
    match feed {
        FeedKind::Popular => scaffolder_engine::FeedKind::Popular,
        FeedKind::Sponsored => scaffolder_engine::FeedKind::Sponsored,
        FeedKind::Favorites => scaffolder_engine::FeedKind::Favorites,
        FeedKind::MySponsored => scaffolder_engine::FeedKind::MySponsored,
    }
}

fn feed_to_core(feed: scaffolder_engine::FeedKind) -> FeedKind {
    match feed {
        scaffolder_engine::FeedKind::Popular => FeedKind::Popular,
        scaffolder_engine::FeedKind::Sponsored => FeedKind::Sponsored,
        scaffolder_engine::FeedKind::Favorites => FeedKind::Favorites,
        scaffolder_engine::FeedKind::MySponsored => FeedKind::MySponsored,
    }
}

fn platform_to_metadata(wire: PlatformRepository) -> PlatformMetadata {
    PlatformMetadata {
        sponsored: wire.sponsored,
        favorite: wire.favorite,
        my_sponsored: wire.my_sponsored,
        favorite_count: wire.favorite_count,
        expiration_date: wire.expiration_date,
    }
}

fn platform_to_record(wire: PlatformRepository) -> Repository {
    let key = RepositoryKey::new(wire.provider.clone(), wire.id.clone());
    Repository::from_platform(key, platform_to_metadata(wire))
}

fn source_to_metadata(wire: SourceRepository) -> SourceMetadata {
    SourceMetadata {
        owner: wire.owner.login,
        name: wire.name,
        description: wire.description.unwrap_or_default(),
        language: wire.language,
        owner_type: wire.owner.owner_type,
        owner_avatar_url: wire.owner.avatar_url,
    }
}

fn source_to_record(wire: SourceRepository) -> Repository {
    let key = RepositoryKey::new(SOURCE_PROVIDER, wire.id.to_string());
    Repository::from_source(key, source_to_metadata(wire))
}
