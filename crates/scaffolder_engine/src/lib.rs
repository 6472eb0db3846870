//! Scaffolder engine: network clients and effect execution.
mod engine;
mod codehost;
mod payment;
mod platform;
mod poller;
mod session;
mod types;

pub use codehost::CodeHostClient;
pub use engine::{EngineCommand, EngineConfig, EngineEvent, EngineHandle, FeedKind};
pub use payment::{PaymentPrompt, PaymentToken};
pub use platform::PlatformClient;
pub use poller::{CreateRepositoryRequest, JobPoller, PollerSettings};
pub use session::{
    AuthenticatedUser, IdentityPrompt, ProviderIdentity, Session, CODE_HOST_PROVIDER,
};
pub use types::{
    ApiError, JobError, JobProgress, JobStep, JobToken, PaymentError, PlatformRepository,
    SearchResults, SessionError, SourceOwner, SourceRepository,
};
