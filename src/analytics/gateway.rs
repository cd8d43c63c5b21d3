use super::loader::{ScriptLoader, TagSettings};
use crate::config::AnalyticsConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

const IDLE: u8 = 0;
const LOADING: u8 = 1;
const ACTIVE: u8 = 2;

/// Guarded activator for the analytics tag.
///
/// Activation happens at most once per gateway lifetime: the first call moves
/// the gateway from idle to loading, and every call made while loading or
/// active is a no-op, whatever measurement id it carries. A failed load puts
/// the gateway back to idle so a later call can retry. Share one gateway per
/// process behind an `Arc`.
pub struct AnalyticsGateway {
    loader: Arc<dyn ScriptLoader>,
    anonymize_ip: bool,
    send_page_view: bool,
    state: AtomicU8,
    attempts: AtomicUsize,
}

impl AnalyticsGateway {
    pub fn new(loader: Arc<dyn ScriptLoader>) -> Self {
        Self {
            loader,
            anonymize_ip: true,
            send_page_view: true,
            state: AtomicU8::new(IDLE),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn from_config(loader: Arc<dyn ScriptLoader>, config: &AnalyticsConfig) -> Self {
        Self {
            anonymize_ip: config.anonymize_ip,
            send_page_view: config.send_page_view,
            ..Self::new(loader)
        }
    }

    pub async fn activate(&self, measurement_id: &str) {
        if self
            .state
            .compare_exchange(IDLE, LOADING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(measurement_id, "analytics already activated, skipping");
            return;
        }

        self.attempts.fetch_add(1, Ordering::Relaxed);
        let mut reset = ResetToIdle {
            state: &self.state,
            armed: true,
        };
        let settings = TagSettings {
            measurement_id: measurement_id.to_string(),
            anonymize_ip: self.anonymize_ip,
            send_page_view: self.send_page_view,
        };

        match self.loader.load(&settings).await {
            Ok(()) => {
                reset.armed = false;
                self.state.store(ACTIVE, Ordering::Release);
                tracing::info!(
                    measurement_id,
                    loader = self.loader.name(),
                    "analytics activated"
                );
            }
            Err(e) => {
                tracing::warn!(
                    measurement_id,
                    loader = self.loader.name(),
                    error = %e,
                    "analytics failed to load; will retry on next activation"
                );
            }
        }
    }

    /// Whether activation has completed. Diagnostics only.
    pub fn is_active(&self) -> bool {
        self.state.load(Ordering::Acquire) == ACTIVE
    }

    /// Number of load attempts made so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }
}

/// Puts the gateway back to idle unless disarmed, so a failed or abandoned
/// load can be retried.
struct ResetToIdle<'a> {
    state: &'a AtomicU8,
    armed: bool,
}

impl Drop for ResetToIdle<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.store(IDLE, Ordering::Release);
        }
    }
}
