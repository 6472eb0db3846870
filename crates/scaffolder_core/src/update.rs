use crate::{AppState, Effect, FeedKind, Msg, ScaffoldWizard};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FeedsRequested {
            include_authenticated,
        } => {
            let mut feeds = vec![FeedKind::Sponsored, FeedKind::Popular];
            if include_authenticated {
                feeds.push(FeedKind::Favorites);
                feeds.push(FeedKind::MySponsored);
            }
            feeds
                .into_iter()
                .map(|feed| Effect::FetchFeed { feed })
                .collect()
        }
        Msg::FeedLoaded { repositories, .. } => state.absorb_repositories(repositories),
        Msg::FeedFailed { feed, message } => {
            state.push_notice(format!("failed to load the {feed} feed: {message}"));
            Vec::new()
        }
        Msg::SearchSubmitted { query } => {
            let query = query.trim().to_string();
            if query.is_empty() {
                Vec::new()
            } else {
                vec![Effect::SearchTemplates { query }]
            }
        }
        Msg::SearchLoaded { repositories } => {
            // Records that never gained platform metadata were pure search
            // hits; a new search supersedes them.
            state.templates_mut().clear_search_only();
            state.absorb_repositories(repositories)
        }
        Msg::SearchFailed { message } => {
            state.push_notice(format!("template search failed: {message}"));
            Vec::new()
        }
        Msg::SourceMetadataLoaded { key, metadata } => {
            state.templates_mut().apply_source_metadata(&key, metadata);
            state.mark_dirty();
            Vec::new()
        }
        Msg::PlatformMetadataLoaded { key, metadata } => {
            if let Some(metadata) = metadata {
                state.templates_mut().apply_platform_metadata(&key, metadata);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::MetadataFetchFailed { key, message } => {
            state.push_notice(format!("failed to fetch metadata for {key}: {message}"));
            Vec::new()
        }
        Msg::FilterChosen(filter) => {
            state.set_filter(filter);
            state.mark_dirty();
            Vec::new()
        }
        Msg::AddFavoriteClicked { key } => vec![Effect::AddFavorite { key }],
        Msg::RemoveFavoriteClicked { key } => vec![Effect::RemoveFavorite { key }],
        Msg::SponsorClicked { key } => {
            // Sponsoring a repository that is already mine is a no-op.
            let already_mine = state
                .templates()
                .get(&key)
                .is_some_and(|repository| repository.is_my_sponsored());
            if already_mine {
                Vec::new()
            } else {
                vec![Effect::Sponsor { key }]
            }
        }
        Msg::CancelSponsorshipClicked { key } => {
            let mine = state
                .templates()
                .get(&key)
                .is_some_and(|repository| repository.is_my_sponsored());
            if mine {
                vec![Effect::CancelSponsorship { key }]
            } else {
                Vec::new()
            }
        }
        Msg::FavoritesChanged { repositories } => {
            state.templates_mut().clear_favorites();
            state.absorb_repositories(repositories)
        }
        Msg::SponsoredChanged { repositories } => {
            state.templates_mut().clear_sponsored();
            state.absorb_repositories(repositories)
        }
        Msg::SponsorshipCancelled { key } => {
            state.templates_mut().clear_my_sponsorship(&key);
            state.mark_dirty();
            Vec::new()
        }
        Msg::PlatformActionFailed { message } => {
            state.push_notice(message);
            Vec::new()
        }
        Msg::ScaffoldStarted {
            template_owner,
            template_name,
            current_year,
        } => {
            let (wizard, effects) = ScaffoldWizard::start(template_owner, template_name, current_year);
            state.set_wizard(wizard);
            state.mark_dirty();
            effects
        }
        Msg::WizardDismissed => {
            state.clear_wizard();
            state.mark_dirty();
            Vec::new()
        }
        Msg::NameSubmitted(name) => {
            with_wizard(&mut state, |wizard, login| wizard.choose_name(&name, login))
        }
        Msg::StepRequested(step) => with_wizard(&mut state, |wizard, login| {
            wizard.try_change_step(step, login)
        }),
        Msg::ReplacementEdited { index, value } => with_wizard(&mut state, |wizard, _| {
            wizard.set_replacement_value(index, value);
            Vec::new()
        }),
        Msg::CreateClicked => {
            with_wizard(&mut state, |wizard, login| wizard.request_creation(login))
        }
        Msg::KeysDiscovered { keys } => with_wizard(&mut state, |wizard, login| {
            wizard.keys_discovered(keys, login)
        }),
        Msg::KeyDiscoveryFailed { message } => with_wizard(&mut state, |wizard, _| {
            wizard.show_error(message);
            Vec::new()
        }),
        Msg::ViewerLoginLoaded { login } => {
            state.set_viewer_login(login.clone());
            state.mark_dirty();
            match state.wizard_mut() {
                Some(wizard) => wizard.viewer_login_available(&login),
                None => Vec::new(),
            }
        }
        Msg::ViewerLoginFailed { message } => {
            let fatal = state
                .wizard_mut()
                .is_some_and(|wizard| wizard.viewer_login_failed(&message));
            if fatal {
                state.mark_dirty();
            } else {
                state.push_notice(format!("could not resolve the signed-in login: {message}"));
            }
            Vec::new()
        }
        Msg::RepositoryCreated { url } => with_wizard(&mut state, |wizard, login| {
            wizard.creation_succeeded(&url, login)
        }),
        Msg::CreationFailed { message } => with_wizard(&mut state, |wizard, _| {
            wizard.show_error(message);
            Vec::new()
        }),
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Wizard messages arriving after the wizard was dismissed are stale
/// completions and fall through without effect.
fn with_wizard(
    state: &mut AppState,
    apply: impl FnOnce(&mut ScaffoldWizard, Option<&str>) -> Vec<Effect>,
) -> Vec<Effect> {
    let login = state.viewer_login().map(str::to_string);
    match state.wizard_mut() {
        Some(wizard) => {
            let effects = apply(wizard, login.as_deref());
            state.mark_dirty();
            effects
        }
        None => Vec::new(),
    }
}
