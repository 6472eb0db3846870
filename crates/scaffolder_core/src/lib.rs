//! Scaffolder core: pure state machine and view-model helpers.
mod collection;
mod effect;
mod msg;
mod replacements;
mod repository;
mod state;
mod update;
mod view_model;
mod wizard;

pub use collection::RepositoryCollection;
pub use effect::{Effect, FeedKind};
pub use msg::Msg;
pub use replacements::{friendly_name, is_current_year_key, is_owner_key, is_repo_name_key};
pub use repository::{
    MergeError, PlatformMetadata, Repository, RepositoryKey, SourceMetadata, TemplateFilter,
};
pub use state::AppState;
pub use update::update;
pub use view_model::{AppViewModel, TemplateCardView, WizardView};
pub use wizard::{ReplacementEntry, ScaffoldWizard, WizardStep};
