use crate::{FeedKind, PlatformMetadata, Repository, RepositoryKey, SourceMetadata, TemplateFilter, WizardStep};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Kick off the background feed fetches. Favorites and my-sponsored are
    /// only requested when a session is (or is about to be) active.
    FeedsRequested { include_authenticated: bool },
    FeedLoaded {
        feed: FeedKind,
        repositories: Vec<Repository>,
    },
    FeedFailed {
        feed: FeedKind,
        message: String,
    },
    /// User submitted a template search against the code host.
    SearchSubmitted { query: String },
    SearchLoaded { repositories: Vec<Repository> },
    SearchFailed { message: String },
    /// A background facet fetch resolved.
    SourceMetadataLoaded {
        key: RepositoryKey,
        metadata: SourceMetadata,
    },
    PlatformMetadataLoaded {
        key: RepositoryKey,
        metadata: Option<PlatformMetadata>,
    },
    MetadataFetchFailed {
        key: RepositoryKey,
        message: String,
    },
    FilterChosen(TemplateFilter),
    AddFavoriteClicked { key: RepositoryKey },
    RemoveFavoriteClicked { key: RepositoryKey },
    SponsorClicked { key: RepositoryKey },
    CancelSponsorshipClicked { key: RepositoryKey },
    /// A favorite mutation returned the authoritative favorites set.
    FavoritesChanged { repositories: Vec<Repository> },
    /// A sponsorship mutation returned the authoritative sponsored set.
    SponsoredChanged { repositories: Vec<Repository> },
    SponsorshipCancelled { key: RepositoryKey },
    PlatformActionFailed { message: String },
    /// User picked a template to scaffold from; (re)activates the wizard.
    ScaffoldStarted {
        template_owner: String,
        template_name: String,
        current_year: i32,
    },
    WizardDismissed,
    NameSubmitted(String),
    StepRequested(WizardStep),
    ReplacementEdited { index: usize, value: String },
    CreateClicked,
    /// Replacement-key discovery job finished.
    KeysDiscovered { keys: Vec<String> },
    KeyDiscoveryFailed { message: String },
    ViewerLoginLoaded { login: String },
    ViewerLoginFailed { message: String },
    /// Repository-creation job finished; carries the destination URL.
    RepositoryCreated { url: String },
    CreationFailed { message: String },
    /// Fallback for placeholder wiring.
    NoOp,
}
