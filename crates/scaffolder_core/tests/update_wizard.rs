use std::sync::Once;

use scaffolder_core::{update, AppState, Effect, Msg, WizardStep};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scaffold_logging::initialize_for_tests);
}

fn start_wizard() -> (AppState, Vec<Effect>) {
    update(
        AppState::new(),
        Msg::ScaffoldStarted {
            template_owner: "octocat".to_string(),
            template_name: "starter".to_string(),
            current_year: 2026,
        },
    )
}

fn wizard_step(state: &AppState) -> (WizardStep, WizardStep) {
    let wizard = state.wizard().expect("wizard active");
    (wizard.current_step(), wizard.max_reachable_step())
}

#[test]
fn activation_issues_key_discovery() {
    init_logging();
    let (state, effects) = start_wizard();

    assert_eq!(
        effects,
        vec![Effect::DiscoverKeys {
            repository_owner: "octocat".to_string(),
            repository_name: "starter".to_string(),
        }]
    );
    assert_eq!(
        wizard_step(&state),
        (WizardStep::ChooseName, WizardStep::ChooseName)
    );
}

#[test]
fn empty_name_sets_validation_message_and_stays_put() {
    init_logging();
    let (state, _) = start_wizard();
    let (state, effects) = update(state, Msg::NameSubmitted("   ".to_string()));

    assert!(effects.is_empty());
    assert_eq!(
        wizard_step(&state),
        (WizardStep::ChooseName, WizardStep::ChooseName)
    );
    let wizard = state.wizard().expect("wizard active");
    assert!(wizard.validation_message().is_some());
    assert!(wizard.error_message().is_none());
}

#[test]
fn valid_name_advances_to_awaiting_replacements() {
    init_logging();
    let (state, _) = start_wizard();
    let (state, _) = update(state, Msg::NameSubmitted("my-repo".to_string()));

    assert_eq!(
        wizard_step(&state),
        (
            WizardStep::AwaitingReplacements,
            WizardStep::AwaitingReplacements
        )
    );
    let wizard = state.wizard().expect("wizard active");
    assert_eq!(wizard.chosen_name(), Some("my-repo"));
    assert!(wizard.validation_message().is_none());
}

#[test]
fn cannot_navigate_past_the_reachable_ceiling() {
    init_logging();
    let (state, _) = start_wizard();
    let (state, _) = update(state, Msg::NameSubmitted("my-repo".to_string()));

    let (state, _) = update(state, Msg::StepRequested(WizardStep::Complete));
    assert_eq!(
        wizard_step(&state).0,
        WizardStep::AwaitingReplacements,
        "cannot skip ahead of max reachable"
    );
}

#[test]
fn discovered_keys_unlock_replacement_entry() {
    init_logging();
    let (state, _) = start_wizard();
    let (state, _) = update(state, Msg::NameSubmitted("my-repo".to_string()));

    let (state, effects) = update(
        state,
        Msg::KeysDiscovered {
            keys: vec![
                "scaffold-project-name-scaffold".to_string(),
                "current-year".to_string(),
                "github-repo-name".to_string(),
            ],
        },
    );

    // Waiting on the replacements step, so the wizard moves on by itself;
    // entering EnterReplacements asks for the signed-in login.
    assert_eq!(
        wizard_step(&state),
        (WizardStep::EnterReplacements, WizardStep::EnterReplacements)
    );
    assert_eq!(effects, vec![Effect::FetchViewerLogin]);

    let wizard = state.wizard().expect("wizard active");
    let entries = wizard.replacements();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].friendly_name, "project name");
    assert_eq!(entries[0].value, "");
    assert_eq!(entries[1].value, "2026");
    assert_eq!(entries[2].value, "my-repo");
}

#[test]
fn keys_arriving_before_the_name_stay_on_choose_name() {
    init_logging();
    let (state, _) = start_wizard();
    let (state, effects) = update(
        state,
        Msg::KeysDiscovered {
            keys: vec!["license-holder".to_string()],
        },
    );

    assert!(effects.is_empty());
    assert_eq!(
        wizard_step(&state),
        (WizardStep::ChooseName, WizardStep::EnterReplacements)
    );

    // Choosing a name now jumps straight past the waiting step.
    let (state, _) = update(state, Msg::NameSubmitted("my-repo".to_string()));
    assert_eq!(wizard_step(&state).0, WizardStep::EnterReplacements);
}

#[test]
fn viewer_login_fills_owner_entries_without_clobbering_edits() {
    init_logging();
    let (state, _) = start_wizard();
    let (state, _) = update(state, Msg::NameSubmitted("my-repo".to_string()));
    let (state, _) = update(
        state,
        Msg::KeysDiscovered {
            keys: vec!["github-owner".to_string(), "scaffold_github_owner_scaffold".to_string()],
        },
    );

    let (state, _) = update(
        state,
        Msg::ReplacementEdited {
            index: 1,
            value: "someone-else".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::ViewerLoginLoaded {
            login: "octofan".to_string(),
        },
    );

    let wizard = state.wizard().expect("wizard active");
    assert_eq!(wizard.replacements()[0].value, "octofan");
    assert_eq!(wizard.replacements()[1].value, "someone-else");
}

#[test]
fn discovery_failure_traps_the_wizard_in_error() {
    init_logging();
    let (state, _) = start_wizard();
    let (state, _) = update(state, Msg::NameSubmitted("my-repo".to_string()));
    let (state, _) = update(
        state,
        Msg::KeyDiscoveryFailed {
            message: "template unreadable".to_string(),
        },
    );

    assert_eq!(wizard_step(&state), (WizardStep::Error, WizardStep::Error));
    assert_eq!(
        state.wizard().expect("wizard active").error_message(),
        Some("template unreadable")
    );

    // Navigation cannot leave the trap.
    let (state, _) = update(state, Msg::StepRequested(WizardStep::EnterReplacements));
    assert_eq!(wizard_step(&state).0, WizardStep::Error);

    // Only re-activation recovers.
    let (state, effects) = update(
        state,
        Msg::ScaffoldStarted {
            template_owner: "octocat".to_string(),
            template_name: "starter".to_string(),
            current_year: 2026,
        },
    );
    assert_eq!(effects.len(), 1);
    assert_eq!(
        wizard_step(&state),
        (WizardStep::ChooseName, WizardStep::ChooseName)
    );
    assert!(state.wizard().expect("wizard active").error_message().is_none());
}

#[test]
fn creation_waits_for_the_login_then_submits() {
    init_logging();
    let (state, _) = start_wizard();
    let (state, _) = update(state, Msg::NameSubmitted("my-repo".to_string()));
    let (state, _) = update(
        state,
        Msg::KeysDiscovered {
            keys: vec!["license-holder".to_string()],
        },
    );
    let (state, _) = update(
        state,
        Msg::ReplacementEdited {
            index: 0,
            value: "Octo Fan".to_string(),
        },
    );

    // No login yet: the creation is deferred behind a login fetch.
    let (state, effects) = update(state, Msg::CreateClicked);
    assert_eq!(effects, vec![Effect::FetchViewerLogin]);
    assert_eq!(wizard_step(&state).0, WizardStep::EnterReplacements);

    let (state, effects) = update(
        state,
        Msg::ViewerLoginLoaded {
            login: "octofan".to_string(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::CreateRepository {
            template_owner: "octocat".to_string(),
            template_name: "starter".to_string(),
            destination_owner: "octofan".to_string(),
            destination_name: "my-repo".to_string(),
            replacements: vec![("license-holder".to_string(), "Octo Fan".to_string())],
        }]
    );
    assert_eq!(wizard_step(&state).0, WizardStep::AwaitingCreation);
    assert_eq!(
        state.wizard().expect("wizard active").destination_url(),
        Some("https://github.com/octofan/my-repo")
    );

    let (state, _) = update(
        state,
        Msg::RepositoryCreated {
            url: "https://github.com/octofan/my-repo".to_string(),
        },
    );
    assert_eq!(
        wizard_step(&state),
        (WizardStep::Complete, WizardStep::Complete)
    );
}

#[test]
fn creation_failure_routes_to_the_error_trap() {
    init_logging();
    let (state, _) = start_wizard();
    let (state, _) = update(state, Msg::NameSubmitted("my-repo".to_string()));
    let (state, _) = update(
        state,
        Msg::KeysDiscovered {
            keys: vec![],
        },
    );
    let (state, _) = update(
        state,
        Msg::ViewerLoginLoaded {
            login: "octofan".to_string(),
        },
    );
    let (state, _) = update(state, Msg::CreateClicked);

    let (state, _) = update(
        state,
        Msg::CreationFailed {
            message: "destination already exists".to_string(),
        },
    );
    assert_eq!(wizard_step(&state), (WizardStep::Error, WizardStep::Error));

    let (state, _) = update(state, Msg::StepRequested(WizardStep::Complete));
    assert_eq!(wizard_step(&state).0, WizardStep::Error);
}

#[test]
fn stale_wizard_messages_after_dismissal_are_ignored() {
    init_logging();
    let (state, _) = start_wizard();
    let (state, _) = update(state, Msg::WizardDismissed);
    assert!(state.wizard().is_none());

    let (state, effects) = update(
        state,
        Msg::KeysDiscovered {
            keys: vec!["license-holder".to_string()],
        },
    );
    assert!(effects.is_empty());
    assert!(state.wizard().is_none());
}
