//! Consent surfaces: the banner and the preference center.
//!
//! Surfaces present a draft and bind to three controller actions (accept all,
//! essential only, confirm custom). They never touch the store; they learn
//! about changes from the `cookie-consent-updated` broadcast and re-read.

pub mod banner;
pub mod draft;
pub mod panel;

pub use banner::{Banner, BannerView};
pub use draft::{CategoryToggle, Draft};
pub use panel::{PanelView, PreferencePanel};

use crate::consent::ConsentRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    Banner,
    Panel,
    Modal,
}

/// Actions a surface can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceAction {
    AcceptAll,
    EssentialOnly,
    Customize,
    Confirm,
    Close,
}

/// Contract shared by every consent surface.
pub trait ConsentSurface {
    fn kind(&self) -> SurfaceKind;

    fn is_open(&self) -> bool;

    /// React to a consent change: close and re-initialize from `record`,
    /// the value just re-read from the store.
    fn on_consent_updated(&mut self, record: Option<&ConsentRecord>);
}
