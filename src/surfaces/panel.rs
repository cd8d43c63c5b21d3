use super::draft::{CategoryToggle, Draft};
use super::{ConsentSurface, SurfaceAction, SurfaceKind};
use crate::consent::events::drain_updates;
use crate::consent::{Category, ConsentController, ConsentRecord, DecisionOutcome, EventReceiver};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub kind: SurfaceKind,
    pub title: &'static str,
    pub toggles: Vec<CategoryToggle>,
    pub actions: Vec<SurfaceAction>,
}

/// Preference center with per-category toggles, shown as a side panel or a
/// modal. Edits stay in the draft until confirmed.
pub struct PreferencePanel {
    controller: Arc<ConsentController>,
    events: EventReceiver,
    kind: SurfaceKind,
    open: bool,
    draft: Draft,
}

impl PreferencePanel {
    pub async fn attach(controller: Arc<ConsentController>, kind: SurfaceKind) -> Self {
        let events = controller.subscribe();
        controller.mount().await;
        let draft = Draft::from_record(controller.record().as_ref());
        Self {
            controller,
            events,
            kind,
            open: false,
            draft,
        }
    }

    pub fn open(&mut self) {
        self.draft = Draft::from_record(self.controller.record().as_ref());
        self.controller.open_preferences();
        self.open = true;
    }

    /// Close without confirming. The draft is discarded.
    pub fn close(&mut self) {
        self.controller.close_preferences();
        self.open = false;
        self.draft = Draft::from_record(self.controller.record().as_ref());
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn set(&mut self, category: Category, enabled: bool) -> bool {
        self.draft.set(category, enabled)
    }

    pub fn toggle(&mut self, category: Category) -> bool {
        self.draft.toggle(category)
    }

    pub async fn confirm(&mut self) -> DecisionOutcome {
        let outcome = self.controller.confirm_custom(&self.draft.to_choice()).await;
        self.open = false;
        self.draft = Draft::from_record(Some(&outcome.record));
        outcome
    }

    /// `None` while closed.
    pub fn view(&self) -> Option<PanelView> {
        self.open.then(|| PanelView {
            kind: self.kind,
            title: "Cookie preferences",
            toggles: self.draft.toggles(),
            actions: vec![
                SurfaceAction::AcceptAll,
                SurfaceAction::EssentialOnly,
                SurfaceAction::Confirm,
                SurfaceAction::Close,
            ],
        })
    }

    pub async fn accept_all(&mut self) -> DecisionOutcome {
        let outcome = self.controller.accept_all().await;
        self.open = false;
        self.draft = Draft::from_record(Some(&outcome.record));
        outcome
    }

    pub async fn essential_only(&mut self) -> DecisionOutcome {
        let outcome = self.controller.essential_only().await;
        self.open = false;
        self.draft = Draft::from_record(Some(&outcome.record));
        outcome
    }

    /// Apply queued broadcasts.
    pub fn sync(&mut self) {
        if drain_updates(&mut self.events) {
            let record = self.controller.reload();
            self.on_consent_updated(record.as_ref());
        }
    }
}

impl ConsentSurface for PreferencePanel {
    fn kind(&self) -> SurfaceKind {
        self.kind
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn on_consent_updated(&mut self, record: Option<&ConsentRecord>) {
        self.open = false;
        self.draft = Draft::from_record(record);
    }
}
