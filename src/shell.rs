use crate::analytics::{TagSettings, render_head_snippet};
use crate::config::AnalyticsConfig;
use crate::consent::{ConsentStore, allows_analytics};

/// Page-shell view of consent: consulted on every route render to decide
/// whether the analytics tag is mounted. It only reads.
pub struct PageShell {
    store: ConsentStore,
    analytics: AnalyticsConfig,
}

impl PageShell {
    pub fn new(store: ConsentStore, analytics: AnalyticsConfig) -> Self {
        Self { store, analytics }
    }

    /// A stored record exists and allows analytics.
    pub fn should_mount_analytics(&self) -> bool {
        match self.store.load() {
            Ok(record) => record.is_some_and(|r| allows_analytics(&r)),
            Err(e) => {
                tracing::warn!(error = %e, "consent storage unavailable; not mounting analytics");
                false
            }
        }
    }

    /// Analytics `<head>` markup for this render, or an empty string.
    pub fn render_head(&self) -> String {
        let Some(measurement_id) = self.analytics.measurement_id() else {
            return String::new();
        };
        if !self.should_mount_analytics() {
            return String::new();
        }

        let settings = TagSettings::from_config(measurement_id, &self.analytics);
        render_head_snippet(&self.analytics.script_url, &settings).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to render analytics head snippet");
            String::new()
        })
    }
}
