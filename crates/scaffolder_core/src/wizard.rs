use crate::replacements::{friendly_name, is_current_year_key, is_owner_key, is_repo_name_key};
use crate::Effect;

/// Wizard steps in rank order. `Error` ranks lowest so that the navigation
/// clamp in `try_change_step` turns it into a one-way trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Error,
    ChooseName,
    AwaitingReplacements,
    EnterReplacements,
    AwaitingCreation,
    Complete,
}

/// One discovered replacement key awaiting a user-supplied value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementEntry {
    pub key: String,
    pub friendly_name: String,
    pub value: String,
}

impl ReplacementEntry {
    fn new(key: String) -> Self {
        let friendly_name = friendly_name(&key);
        Self {
            key,
            friendly_name,
            value: String::new(),
        }
    }
}

/// Forward-only wizard over one chosen template repository.
///
/// The user may navigate backward freely among already-reached steps but
/// never ahead of `max_reachable_step`; failures collapse both step fields
/// to `Error`, from which only a fresh activation recovers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldWizard {
    template_owner: String,
    template_name: String,
    current_year: i32,
    current_step: WizardStep,
    max_reachable_step: WizardStep,
    error_message: Option<String>,
    validation_message: Option<String>,
    chosen_name: Option<String>,
    replacements: Vec<ReplacementEntry>,
    pending_create: bool,
    destination_url: Option<String>,
}

impl ScaffoldWizard {
    /// Activate the wizard for a template; also issues the key-discovery job.
    pub fn start(
        template_owner: impl Into<String>,
        template_name: impl Into<String>,
        current_year: i32,
    ) -> (Self, Vec<Effect>) {
        let wizard = Self {
            template_owner: template_owner.into(),
            template_name: template_name.into(),
            current_year,
            current_step: WizardStep::ChooseName,
            max_reachable_step: WizardStep::ChooseName,
            error_message: None,
            validation_message: None,
            chosen_name: None,
            replacements: Vec::new(),
            pending_create: false,
            destination_url: None,
        };
        let effects = vec![Effect::DiscoverKeys {
            repository_owner: wizard.template_owner.clone(),
            repository_name: wizard.template_name.clone(),
        }];
        (wizard, effects)
    }

    pub fn template_owner(&self) -> &str {
        &self.template_owner
    }

    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn max_reachable_step(&self) -> WizardStep {
        self.max_reachable_step
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn validation_message(&self) -> Option<&str> {
        self.validation_message.as_deref()
    }

    pub fn chosen_name(&self) -> Option<&str> {
        self.chosen_name.as_deref()
    }

    pub fn replacements(&self) -> &[ReplacementEntry] {
        &self.replacements
    }

    pub fn destination_url(&self) -> Option<&str> {
        self.destination_url.as_deref()
    }

    /// Record the destination name, or set an inline validation message when
    /// it is empty. Valid names advance the wizard past `ChooseName`.
    pub fn choose_name(&mut self, name: &str, viewer_login: Option<&str>) -> Vec<Effect> {
        let name = name.trim();
        if name.is_empty() {
            self.validation_message =
                Some("the destination repository needs a name".to_string());
            return Vec::new();
        }
        self.validation_message = None;
        self.chosen_name = Some(name.to_string());
        for entry in &mut self.replacements {
            if is_repo_name_key(&entry.key) {
                entry.value = name.to_string();
            }
        }
        self.advance(WizardStep::AwaitingReplacements, viewer_login)
    }

    /// Navigate to `desired`, clamped to the highest step reached so far.
    pub fn try_change_step(
        &mut self,
        desired: WizardStep,
        viewer_login: Option<&str>,
    ) -> Vec<Effect> {
        self.current_step = desired.min(self.max_reachable_step);
        if self.current_step >= WizardStep::EnterReplacements {
            match viewer_login {
                Some(login) => {
                    self.fill_owner_entries(login);
                    Vec::new()
                }
                // Fire-and-forget; the transition itself never waits.
                None => vec![Effect::FetchViewerLogin],
            }
        } else {
            Vec::new()
        }
    }

    /// Raise the reachable ceiling to at least `suggested`, then move there.
    pub fn advance(&mut self, suggested: WizardStep, viewer_login: Option<&str>) -> Vec<Effect> {
        if self.max_reachable_step < suggested {
            self.max_reachable_step = suggested;
        }
        self.try_change_step(self.max_reachable_step, viewer_login)
    }

    /// One-way trap: both step fields drop to `Error` until reactivation.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
        self.max_reachable_step = WizardStep::Error;
        self.current_step = WizardStep::Error;
    }

    /// Apply the result of the key-discovery job, one entry per key in
    /// discovery order. Year-pattern keys are pre-filled immediately.
    pub fn keys_discovered(&mut self, keys: Vec<String>, viewer_login: Option<&str>) -> Vec<Effect> {
        if self.current_step == WizardStep::Error {
            return Vec::new();
        }
        self.replacements = keys.into_iter().map(ReplacementEntry::new).collect();
        for entry in &mut self.replacements {
            if is_current_year_key(&entry.key) {
                entry.value = self.current_year.to_string();
            } else if is_repo_name_key(&entry.key) {
                if let Some(name) = &self.chosen_name {
                    entry.value = name.clone();
                }
            }
        }
        if self.max_reachable_step < WizardStep::EnterReplacements {
            self.max_reachable_step = WizardStep::EnterReplacements;
        }
        // If the user is already sitting on the waiting step, move them on.
        if self.current_step >= WizardStep::AwaitingReplacements {
            self.try_change_step(WizardStep::EnterReplacements, viewer_login)
        } else {
            Vec::new()
        }
    }

    pub fn set_replacement_value(&mut self, index: usize, value: String) {
        if let Some(entry) = self.replacements.get_mut(index) {
            entry.value = value;
        }
    }

    /// The authenticated login became available; fill owner-pattern entries
    /// and resume a creation that was waiting on it.
    pub fn viewer_login_available(&mut self, login: &str) -> Vec<Effect> {
        if self.current_step == WizardStep::Error {
            return Vec::new();
        }
        self.fill_owner_entries(login);
        if self.pending_create {
            self.pending_create = false;
            self.begin_creation(login)
        } else {
            Vec::new()
        }
    }

    /// The login could not be resolved. Fatal only when a creation was
    /// waiting on it; otherwise the owner entries simply stay empty.
    pub fn viewer_login_failed(&mut self, message: &str) -> bool {
        if self.pending_create && self.current_step != WizardStep::Error {
            self.pending_create = false;
            self.show_error(message.to_string());
            true
        } else {
            false
        }
    }

    /// Submit the creation job, first resolving the identity if necessary.
    pub fn request_creation(&mut self, viewer_login: Option<&str>) -> Vec<Effect> {
        if self.current_step == WizardStep::Error {
            return Vec::new();
        }
        if self.chosen_name.is_none() {
            self.show_error("no destination repository name was chosen");
            return Vec::new();
        }
        match viewer_login {
            Some(login) => self.begin_creation(login),
            None => {
                self.pending_create = true;
                vec![Effect::FetchViewerLogin]
            }
        }
    }

    pub fn creation_succeeded(&mut self, url: &str, viewer_login: Option<&str>) -> Vec<Effect> {
        if self.current_step == WizardStep::Error {
            return Vec::new();
        }
        if !url.is_empty() {
            self.destination_url = Some(url.to_string());
        }
        self.advance(WizardStep::Complete, viewer_login)
    }

    fn begin_creation(&mut self, login: &str) -> Vec<Effect> {
        let Some(name) = self.chosen_name.clone() else {
            self.show_error("no destination repository name was chosen");
            return Vec::new();
        };
        self.destination_url = Some(format!("https://github.com/{login}/{name}"));
        let mut effects = self.advance(WizardStep::AwaitingCreation, Some(login));
        effects.push(Effect::CreateRepository {
            template_owner: self.template_owner.clone(),
            template_name: self.template_name.clone(),
            destination_owner: login.to_string(),
            destination_name: name,
            replacements: self
                .replacements
                .iter()
                .map(|entry| (entry.key.clone(), entry.value.clone()))
                .collect(),
        });
        effects
    }

    fn fill_owner_entries(&mut self, login: &str) {
        for entry in &mut self.replacements {
            if is_owner_key(&entry.key) && entry.value.is_empty() {
                entry.value = login.to_string();
            }
        }
    }
}
