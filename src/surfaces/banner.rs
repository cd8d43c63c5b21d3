use super::panel::PreferencePanel;
use super::{ConsentSurface, SurfaceAction, SurfaceKind};
use crate::consent::events::drain_updates;
use crate::consent::{ConsentController, ConsentRecord, DecisionOutcome, EventReceiver};
use serde::Serialize;
use std::sync::Arc;

const BANNER_MESSAGE: &str = "We use cookies to run this site and, with your permission, \
     to understand how it is used. Choose which categories you allow.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BannerView {
    pub message: &'static str,
    pub actions: Vec<SurfaceAction>,
}

/// First-visit consent banner.
pub struct Banner {
    controller: Arc<ConsentController>,
    events: EventReceiver,
    open: bool,
}

impl Banner {
    /// Attach to the controller once the mount-time read has resolved.
    pub async fn attach(controller: Arc<ConsentController>) -> Self {
        let events = controller.subscribe();
        controller.mount().await;
        let open = controller.banner_visible();
        Self {
            controller,
            events,
            open,
        }
    }

    /// `None` while hidden.
    pub fn view(&self) -> Option<BannerView> {
        self.open.then(|| BannerView {
            message: BANNER_MESSAGE,
            actions: vec![
                SurfaceAction::AcceptAll,
                SurfaceAction::EssentialOnly,
                SurfaceAction::Customize,
            ],
        })
    }

    pub async fn accept_all(&mut self) -> DecisionOutcome {
        let outcome = self.controller.accept_all().await;
        self.open = false;
        outcome
    }

    pub async fn essential_only(&mut self) -> DecisionOutcome {
        let outcome = self.controller.essential_only().await;
        self.open = false;
        outcome
    }

    /// Open the preference center seeded from the last known record.
    pub async fn customize(&self) -> PreferencePanel {
        let mut panel =
            PreferencePanel::attach(Arc::clone(&self.controller), SurfaceKind::Panel).await;
        panel.open();
        panel
    }

    /// Apply queued broadcasts. Also closes the banner if the session was
    /// decided without a successful write (nothing was broadcast then).
    pub fn sync(&mut self) {
        let decided_elsewhere = self.open && !self.controller.banner_visible();
        if drain_updates(&mut self.events) || decided_elsewhere {
            let record = self.controller.reload();
            self.on_consent_updated(record.as_ref());
        }
    }
}

impl ConsentSurface for Banner {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Banner
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn on_consent_updated(&mut self, _record: Option<&ConsentRecord>) {
        self.open = self.controller.banner_visible();
    }
}
