use super::events::{ConsentEvent, EventReceiver, EventSender, event_bus};
use super::model::{ConsentChoice, ConsentRecord, allows_analytics, normalize_at, now_millis};
use super::store::ConsentStore;
use crate::analytics::AnalyticsGateway;
use crate::config::ControllerConfig;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Where the session stands with respect to consent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentPhase {
    /// The store has not been read yet.
    Unknown,
    /// No usable record; the banner must be shown.
    Pending,
    /// A record exists for this session.
    Decided,
}

/// Result of a visitor decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionOutcome {
    /// The record now in effect for the session.
    pub record: ConsentRecord,
    /// `false` when the decision repeated the current one inside the debounce
    /// window and was dropped.
    pub applied: bool,
    /// Whether the record reached durable storage.
    pub persisted: bool,
    /// Whether analytics activation was requested for this decision.
    pub analytics_requested: bool,
}

#[derive(Debug)]
struct SessionState {
    phase: ConsentPhase,
    record: Option<ConsentRecord>,
    preferences_open: bool,
    last_decision_at: Option<Instant>,
}

/// Orchestrates the consent lifecycle for one session.
///
/// Reads the store once on mount, decides banner visibility, writes every
/// decision, broadcasts [`ConsentEvent::Updated`] after each successful write
/// and activates analytics when the record allows it. It is the only writer
/// to the store. Storage failures never escape: a failed read leaves the
/// session pending, a failed write keeps the decision in memory only.
///
/// Analytics activation runs on a spawned task so mount and decisions never
/// wait for the tag download; [`ConsentController::settle_analytics`] waits
/// for it explicitly. Must be used inside a tokio runtime.
pub struct ConsentController {
    store: ConsentStore,
    gateway: Arc<AnalyticsGateway>,
    measurement_id: Option<String>,
    events: EventSender,
    debounce: Duration,
    state: Mutex<SessionState>,
    decisions: tokio::sync::Mutex<()>,
    activations: Mutex<Vec<JoinHandle<()>>>,
}

impl ConsentController {
    pub fn new(
        store: ConsentStore,
        gateway: Arc<AnalyticsGateway>,
        config: &ControllerConfig,
    ) -> Self {
        let (events, _) = event_bus(config.event_capacity.max(1));
        Self {
            store,
            gateway,
            measurement_id: None,
            events,
            debounce: Duration::from_millis(config.debounce_ms),
            state: Mutex::new(SessionState {
                phase: ConsentPhase::Unknown,
                record: None,
                preferences_open: false,
                last_decision_at: None,
            }),
            decisions: tokio::sync::Mutex::new(()),
            activations: Mutex::new(Vec::new()),
        }
    }

    pub fn with_measurement_id(mut self, measurement_id: impl Into<String>) -> Self {
        let id = measurement_id.into();
        self.measurement_id = (!id.trim().is_empty()).then(|| id.trim().to_string());
        self
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Mount ────────────────────────────────────────────────────────

    /// Read the stored decision. Runs once; later calls return the current
    /// phase without touching the store.
    pub async fn mount(&self) -> ConsentPhase {
        let _serial = self.decisions.lock().await;
        self.mount_locked().await
    }

    async fn mount_locked(&self) -> ConsentPhase {
        let current = self.state().phase;
        if current != ConsentPhase::Unknown {
            return current;
        }

        let loaded = match self.store.load() {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    backend = self.store.backend(),
                    error = %e,
                    "consent storage unavailable on mount; prompting"
                );
                None
            }
        };

        let phase = if loaded.is_some() {
            ConsentPhase::Decided
        } else {
            ConsentPhase::Pending
        };
        {
            let mut state = self.state();
            state.phase = phase;
            state.record = loaded;
        }
        tracing::info!(?phase, "consent mounted");

        if let Some(record) = loaded {
            self.activate_if_permitted(&record);
        }
        phase
    }

    // ── Decisions ────────────────────────────────────────────────────

    pub async fn accept_all(&self) -> DecisionOutcome {
        self.decide(&ConsentChoice::accept_all()).await
    }

    pub async fn essential_only(&self) -> DecisionOutcome {
        self.decide(&ConsentChoice::essential_only()).await
    }

    /// Confirm a draft edited in a customization surface.
    pub async fn confirm_custom(&self, draft: &ConsentChoice) -> DecisionOutcome {
        self.decide(draft).await
    }

    /// Normalize, persist, broadcast and (if permitted) activate analytics.
    pub async fn decide(&self, choice: &ConsentChoice) -> DecisionOutcome {
        let _serial = self.decisions.lock().await;
        self.mount_locked().await;

        let now = Instant::now();
        let previous = {
            let mut state = self.state();
            if let (Some(current), Some(at)) = (state.record, state.last_decision_at) {
                let candidate = normalize_at(choice, current.timestamp);
                if current.same_preferences(&candidate) && now.duration_since(at) < self.debounce {
                    tracing::debug!("dropping repeated consent decision inside debounce window");
                    state.preferences_open = false;
                    return DecisionOutcome {
                        record: current,
                        applied: false,
                        persisted: false,
                        analytics_requested: false,
                    };
                }
            }
            state.record
        };

        let timestamp = next_timestamp(previous.as_ref(), now_millis());
        let record = normalize_at(choice, timestamp);

        let persisted = match self.store.save(&record) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    backend = self.store.backend(),
                    error = %e,
                    "failed to persist consent; decision applies to this session only"
                );
                false
            }
        };

        {
            let mut state = self.state();
            state.phase = ConsentPhase::Decided;
            state.record = Some(record);
            state.preferences_open = false;
            state.last_decision_at = Some(now);
        }
        tracing::info!(
            performance = record.performance,
            functional = record.functional,
            targeting = record.targeting,
            persisted,
            "consent decided"
        );

        if persisted {
            self.broadcast();
        }

        let analytics_requested = self.activate_if_permitted(&record);
        DecisionOutcome {
            record,
            applied: true,
            persisted,
            analytics_requested,
        }
    }

    /// Remove the stored decision and return to prompting. Debug/testing only.
    pub async fn clear(&self) {
        let _serial = self.decisions.lock().await;
        let cleared = match self.store.clear() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to clear stored consent");
                false
            }
        };

        {
            let mut state = self.state();
            state.phase = ConsentPhase::Pending;
            state.record = None;
            state.preferences_open = false;
            state.last_decision_at = None;
        }
        tracing::info!("consent cleared");

        if cleared {
            self.broadcast();
        }
    }

    fn broadcast(&self) {
        // No subscribers is fine: nothing is mounted to react.
        let _ = self.events.send(ConsentEvent::Updated);
    }

    /// Start activation in the background when `record` allows it. Returns
    /// whether activation was requested.
    fn activate_if_permitted(&self, record: &ConsentRecord) -> bool {
        if !allows_analytics(record) {
            return false;
        }
        let Some(measurement_id) = self.measurement_id.clone() else {
            tracing::info!("analytics permitted but no measurement id configured");
            return false;
        };

        let gateway = Arc::clone(&self.gateway);
        let handle = tokio::spawn(async move { gateway.activate(&measurement_id).await });

        let mut activations = self
            .activations
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        activations.retain(|h| !h.is_finished());
        activations.push(handle);
        true
    }

    /// Wait for every activation started so far to finish, successfully or not.
    pub async fn settle_analytics(&self) {
        let pending = std::mem::take(
            &mut *self
                .activations
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for handle in pending {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "analytics activation task ended abnormally");
            }
        }
    }

    // ── Preference center ────────────────────────────────────────────

    pub fn open_preferences(&self) {
        self.state().preferences_open = true;
    }

    /// Close without confirming: no write, no transition.
    pub fn close_preferences(&self) {
        self.state().preferences_open = false;
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> ConsentPhase {
        self.state().phase
    }

    /// The authoritative in-memory record for this session.
    pub fn record(&self) -> Option<ConsentRecord> {
        self.state().record
    }

    pub fn banner_visible(&self) -> bool {
        self.phase() == ConsentPhase::Pending
    }

    pub fn preferences_visible(&self) -> bool {
        self.state().preferences_open
    }

    pub fn analytics_permitted(&self) -> bool {
        self.record().is_some_and(|r| allows_analytics(&r))
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    /// Re-read the stored record, as a listener does after a broadcast.
    pub fn reload(&self) -> Option<ConsentRecord> {
        match self.store.load() {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "consent storage unavailable on reload");
                None
            }
        }
    }

    pub fn store(&self) -> &ConsentStore {
        &self.store
    }

    pub fn gateway(&self) -> &Arc<AnalyticsGateway> {
        &self.gateway
    }

    pub fn measurement_id(&self) -> Option<&str> {
        self.measurement_id.as_deref()
    }
}

/// Write time for a new record: wall clock, but always past the previous one.
fn next_timestamp(previous: Option<&ConsentRecord>, wall: i64) -> i64 {
    previous.map_or(wall, |p| wall.max(p.timestamp.saturating_add(1)))
}
