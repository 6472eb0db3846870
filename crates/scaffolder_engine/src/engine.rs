use std::sync::{mpsc, Arc};
use std::thread;

use scaffold_logging::{scaffold_debug, scaffold_error};
use url::Url;

use crate::codehost::CodeHostClient;
use crate::payment::PaymentPrompt;
use crate::platform::PlatformClient;
use crate::poller::{CreateRepositoryRequest, JobPoller, PollerSettings};
use crate::session::{AuthenticatedUser, IdentityPrompt, Session};
use crate::types::{ApiError, JobError, PlatformRepository, SessionError, SourceRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Popular,
    Sponsored,
    Favorites,
    MySponsored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    FetchFeed {
        feed: FeedKind,
    },
    Search {
        query: String,
    },
    FetchSourceMetadata {
        provider: String,
        id: String,
    },
    FetchPlatformMetadata {
        provider: String,
        id: String,
    },
    AddFavorite {
        provider: String,
        id: String,
    },
    RemoveFavorite {
        provider: String,
        id: String,
    },
    Sponsor {
        provider: String,
        id: String,
    },
    CancelSponsorship {
        provider: String,
        id: String,
    },
    DiscoverKeys {
        repository_owner: String,
        repository_name: String,
    },
    CreateRepository {
        template_owner: String,
        template_name: String,
        destination_owner: String,
        destination_name: String,
        replacements: Vec<(String, String)>,
    },
    FetchViewerLogin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    FeedLoaded {
        feed: FeedKind,
        result: Result<Vec<PlatformRepository>, ApiError>,
    },
    SearchCompleted {
        result: Result<Vec<SourceRepository>, ApiError>,
    },
    SourceMetadataFetched {
        provider: String,
        id: String,
        result: Result<SourceRepository, ApiError>,
    },
    PlatformMetadataFetched {
        provider: String,
        id: String,
        result: Result<Option<PlatformRepository>, ApiError>,
    },
    FavoritesUpdated {
        result: Result<Vec<PlatformRepository>, ApiError>,
    },
    SponsoredUpdated {
        result: Result<Vec<PlatformRepository>, ApiError>,
    },
    SponsorshipCancelled {
        provider: String,
        id: String,
        result: Result<(), ApiError>,
    },
    KeysDiscovered {
        result: Result<Vec<String>, JobError>,
    },
    RepositoryCreated {
        result: Result<String, JobError>,
    },
    ViewerLoginResolved {
        result: Result<String, SessionError>,
    },
}

pub struct EngineConfig {
    pub platform_base_url: Url,
    pub code_host_base_url: Url,
    pub poller: PollerSettings,
    pub identity: Arc<dyn IdentityPrompt>,
    pub payment: Arc<dyn PaymentPrompt>,
    /// A session restored from an earlier run, if any.
    pub initial_user: Option<AuthenticatedUser>,
}

struct EngineClients {
    platform: PlatformClient,
    code_host: CodeHostClient,
    poller: JobPoller,
    session: Arc<Session>,
}

/// Owns the network runtime. Commands go in over a channel, completions
/// come back as events; the caller polls `try_recv` from its own loop.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, ApiError> {
        let session = Arc::new(Session::new(config.identity.clone(), config.initial_user));
        let platform = PlatformClient::new(
            config.platform_base_url.clone(),
            session.clone(),
            config.payment.clone(),
        )?;
        let code_host = CodeHostClient::new(config.code_host_base_url, session.clone())?;
        let poller = JobPoller::new(config.platform_base_url, session.clone(), config.poller)
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let clients = Arc::new(EngineClients {
            platform,
            code_host,
            poller,
            session,
        });

        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    scaffold_error!("failed to start the engine runtime: {err}");
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let clients = clients.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(clients.as_ref(), command, event_tx).await;
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn enqueue(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    clients: &EngineClients,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    scaffold_debug!("engine command: {command:?}");
    let event = match command {
        EngineCommand::FetchFeed { feed } => {
            let result = match feed {
                FeedKind::Popular => clients.platform.get_popular().await,
                FeedKind::Sponsored => clients.platform.get_sponsored().await,
                FeedKind::Favorites => clients.platform.get_favorites().await,
                FeedKind::MySponsored => clients.platform.get_my_sponsored().await,
            };
            EngineEvent::FeedLoaded { feed, result }
        }
        EngineCommand::Search { query } => EngineEvent::SearchCompleted {
            result: clients.code_host.search(&query).await,
        },
        EngineCommand::FetchSourceMetadata { provider, id } => {
            let result = clients.code_host.get_repository(&id).await;
            EngineEvent::SourceMetadataFetched {
                provider,
                id,
                result,
            }
        }
        EngineCommand::FetchPlatformMetadata { provider, id } => {
            let result = clients
                .platform
                .get_repository_metadata(&provider, &id)
                .await;
            EngineEvent::PlatformMetadataFetched {
                provider,
                id,
                result,
            }
        }
        EngineCommand::AddFavorite { provider, id } => EngineEvent::FavoritesUpdated {
            result: clients.platform.add_favorite(&provider, &id).await,
        },
        EngineCommand::RemoveFavorite { provider, id } => EngineEvent::FavoritesUpdated {
            result: clients.platform.remove_favorite(&provider, &id).await,
        },
        EngineCommand::Sponsor { provider, id } => EngineEvent::SponsoredUpdated {
            result: clients.platform.sponsor(&provider, &id).await,
        },
        EngineCommand::CancelSponsorship { provider, id } => {
            let result = clients.platform.cancel_sponsorship(&provider, &id).await;
            EngineEvent::SponsorshipCancelled {
                provider,
                id,
                result,
            }
        }
        EngineCommand::DiscoverKeys {
            repository_owner,
            repository_name,
        } => EngineEvent::KeysDiscovered {
            result: clients
                .poller
                .find_keys(&repository_owner, &repository_name)
                .await,
        },
        EngineCommand::CreateRepository {
            template_owner,
            template_name,
            destination_owner,
            destination_name,
            replacements,
        } => {
            let request = CreateRepositoryRequest {
                template_repository_owner: template_owner,
                template_repository_name: template_name,
                destination_repository_owner: destination_owner,
                destination_repository_name: destination_name,
                replacements: replacements.into_iter().collect(),
            };
            EngineEvent::RepositoryCreated {
                result: clients.poller.create_repository(&request).await,
            }
        }
        EngineCommand::FetchViewerLogin => EngineEvent::ViewerLoginResolved {
            result: clients.session.login().await,
        },
    };
    let _ = event_tx.send(event);
}
