use std::cmp::Reverse;

use crate::view_model::{AppViewModel, TemplateCardView, WizardView};
use crate::{Effect, Repository, RepositoryCollection, ScaffoldWizard, TemplateFilter};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    templates: RepositoryCollection,
    filter: TemplateFilter,
    wizard: Option<ScaffoldWizard>,
    viewer_login: Option<String>,
    notices: Vec<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn templates(&self) -> &RepositoryCollection {
        &self.templates
    }

    pub fn wizard(&self) -> Option<&ScaffoldWizard> {
        self.wizard.as_ref()
    }

    pub fn filter(&self) -> TemplateFilter {
        self.filter
    }

    pub fn viewer_login(&self) -> Option<&str> {
        self.viewer_login.as_deref()
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn view(&self) -> AppViewModel {
        let mut templates: Vec<&Repository> = self
            .templates
            .iter()
            .filter(|repository| repository.matches_filter(self.filter))
            .collect();
        // Sponsored templates lead, then the most-favorited. The collection
        // iterates in key order, so the stable sort keeps ties deterministic.
        templates.sort_by_key(|repository| {
            (
                Reverse(repository.is_sponsored()),
                Reverse(repository.favorite_count()),
            )
        });

        AppViewModel {
            filter: self.filter,
            templates: templates
                .into_iter()
                .map(TemplateCardView::from_repository)
                .collect(),
            wizard: self.wizard.as_ref().map(WizardView::from_wizard),
            notices: self.notices.clone(),
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn templates_mut(&mut self) -> &mut RepositoryCollection {
        &mut self.templates
    }

    pub(crate) fn wizard_mut(&mut self) -> Option<&mut ScaffoldWizard> {
        self.wizard.as_mut()
    }

    pub(crate) fn set_wizard(&mut self, wizard: ScaffoldWizard) {
        self.wizard = Some(wizard);
    }

    pub(crate) fn clear_wizard(&mut self) {
        self.wizard = None;
    }

    pub(crate) fn set_filter(&mut self, filter: TemplateFilter) {
        self.filter = filter;
    }

    pub(crate) fn set_viewer_login(&mut self, login: String) {
        self.viewer_login = Some(login);
    }

    pub(crate) fn push_notice(&mut self, notice: String) {
        self.notices.push(notice);
        self.dirty = true;
    }

    /// Add records to the collection, converting the (unreachable in correct
    /// operation) identity mismatch into a notice rather than a panic.
    pub(crate) fn absorb_repositories(&mut self, repositories: Vec<Repository>) -> Vec<Effect> {
        match self.templates.add_many(repositories) {
            Ok(effects) => {
                self.dirty = true;
                effects
            }
            Err(error) => {
                self.push_notice(error.to_string());
                Vec::new()
            }
        }
    }
}
