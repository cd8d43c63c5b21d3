use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Name of the consent change notification on the page event bus.
pub const CONSENT_UPDATED_EVENT: &str = "cookie-consent-updated";

/// Process-wide consent notifications.
///
/// Carries no payload; listeners re-read the store when they need the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsentEvent {
    Updated,
}

impl ConsentEvent {
    pub fn name(self) -> &'static str {
        match self {
            Self::Updated => CONSENT_UPDATED_EVENT,
        }
    }
}

pub type EventSender = broadcast::Sender<ConsentEvent>;
pub type EventReceiver = broadcast::Receiver<ConsentEvent>;

/// Create a broadcast event bus with the given capacity.
pub fn event_bus(capacity: usize) -> (EventSender, EventReceiver) {
    broadcast::channel(capacity)
}

/// Drain every queued notification without waiting.
///
/// Returns `true` if at least one update (or a lag, which implies updates)
/// was observed.
pub fn drain_updates(rx: &mut EventReceiver) -> bool {
    let mut updated = false;
    loop {
        match rx.try_recv() {
            Ok(ConsentEvent::Updated) | Err(broadcast::error::TryRecvError::Lagged(_)) => {
                updated = true;
            }
            Err(
                broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
            ) => return updated,
        }
    }
}
