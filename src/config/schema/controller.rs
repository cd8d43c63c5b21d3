use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Identical decisions submitted within this window are dropped
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Broadcast channel capacity for `cookie-consent-updated` events
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_event_capacity() -> usize {
    16
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            event_capacity: default_event_capacity(),
        }
    }
}
