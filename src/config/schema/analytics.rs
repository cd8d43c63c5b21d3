use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Measurement id handed to the tag script (deploy-time setting, never user input)
    #[serde(default)]
    pub measurement_id: Option<String>,
    /// Tag script endpoint; the measurement id is appended as `?id=`
    #[serde(default = "default_script_url")]
    pub script_url: String,
    #[serde(default = "default_true")]
    pub anonymize_ip: bool,
    #[serde(default = "default_true")]
    pub send_page_view: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_script_url() -> String {
    "https://www.googletagmanager.com/gtag/js".into()
}

fn default_true() -> bool {
    true
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl AnalyticsConfig {
    /// Configured measurement id, ignoring blank values.
    pub fn measurement_id(&self) -> Option<&str> {
        self.measurement_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            measurement_id: None,
            script_url: default_script_url(),
            anonymize_ip: true,
            send_page_view: true,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
