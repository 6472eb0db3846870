use crate::{ReplacementEntry, Repository, ScaffoldWizard, TemplateFilter, WizardStep};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub filter: TemplateFilter,
    pub templates: Vec<TemplateCardView>,
    pub wizard: Option<WizardView>,
    pub notices: Vec<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCardView {
    pub key: String,
    pub owner: String,
    pub name: String,
    pub description: String,
    pub language: Option<String>,
    pub owner_avatar_url: String,
    pub code_host_link: String,
    pub favorite_count: u32,
    pub is_sponsored: bool,
    pub is_popular: bool,
    pub is_favorite: bool,
    pub is_my_sponsored: bool,
}

impl TemplateCardView {
    pub(crate) fn from_repository(repository: &Repository) -> Self {
        let owner = repository
            .source()
            .map_or("unknown", |source| source.owner.as_str());
        let name = repository
            .source()
            .map_or("unknown", |source| source.name.as_str());
        Self {
            key: repository.key().to_string(),
            owner: owner.to_string(),
            name: name.to_string(),
            description: repository
                .source()
                .map_or(String::new(), |source| source.description.clone()),
            language: repository.source().and_then(|source| source.language.clone()),
            owner_avatar_url: repository
                .source()
                .map_or(String::new(), |source| source.owner_avatar_url.clone()),
            code_host_link: format!("https://github.com/{owner}/{name}"),
            favorite_count: repository.favorite_count(),
            is_sponsored: repository.is_sponsored(),
            is_popular: repository.is_popular(),
            is_favorite: repository.is_favorite(),
            is_my_sponsored: repository.is_my_sponsored(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardView {
    pub template_owner: String,
    pub template_name: String,
    pub step: WizardStep,
    pub max_reachable_step: WizardStep,
    pub error_message: Option<String>,
    pub validation_message: Option<String>,
    pub chosen_name: Option<String>,
    pub replacements: Vec<ReplacementEntry>,
    pub destination_url: Option<String>,
}

impl WizardView {
    pub(crate) fn from_wizard(wizard: &ScaffoldWizard) -> Self {
        Self {
            template_owner: wizard.template_owner().to_string(),
            template_name: wizard.template_name().to_string(),
            step: wizard.current_step(),
            max_reachable_step: wizard.max_reachable_step(),
            error_message: wizard.error_message().map(str::to_string),
            validation_message: wizard.validation_message().map(str::to_string),
            chosen_name: wizard.chosen_name().map(str::to_string),
            replacements: wizard.replacements().to_vec(),
            destination_url: wizard.destination_url().map(str::to_string),
        }
    }
}
