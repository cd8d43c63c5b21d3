use crate::config::AnalyticsConfig;
use crate::error::AnalyticsError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// Configuration handed to the tag on activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSettings {
    pub measurement_id: String,
    pub anonymize_ip: bool,
    pub send_page_view: bool,
}

impl TagSettings {
    pub fn new(measurement_id: impl Into<String>) -> Self {
        Self {
            measurement_id: measurement_id.into(),
            anonymize_ip: true,
            send_page_view: true,
        }
    }

    pub fn from_config(measurement_id: impl Into<String>, config: &AnalyticsConfig) -> Self {
        Self {
            measurement_id: measurement_id.into(),
            anonymize_ip: config.anonymize_ip,
            send_page_view: config.send_page_view,
        }
    }

    /// The `gtag('config', ...)` parameters.
    pub fn config_params(&self) -> Value {
        json!({
            "anonymize_ip": self.anonymize_ip,
            "send_page_view": self.send_page_view,
        })
    }
}

/// Injects and initializes the third-party analytics capability.
#[async_trait]
pub trait ScriptLoader: Send + Sync {
    fn name(&self) -> &str;

    async fn load(&self, settings: &TagSettings) -> Result<(), AnalyticsError>;
}

/// Commands queued for the tag, in the order the page would push them.
#[derive(Debug, Default)]
pub struct DataLayer {
    commands: Mutex<Vec<Value>>,
}

impl DataLayer {
    pub fn push(&self, command: Value) {
        if let Ok(mut guard) = self.commands.lock() {
            guard.push(command);
        }
    }

    pub fn snapshot(&self) -> Vec<Value> {
        self.commands
            .lock()
            .map(|guard| guard.to_vec())
            .unwrap_or_default()
    }
}

/// Fetches the tag script for the measurement id and, once it is served,
/// records the `js` / `config` commands in the data layer.
pub struct RemoteTagLoader {
    client: reqwest::Client,
    script_url: String,
    data_layer: DataLayer,
}

impl RemoteTagLoader {
    pub fn new(config: &AnalyticsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build tag HTTP client ({e}), using defaults");
                reqwest::Client::new()
            });
        Self {
            client,
            script_url: config.script_url.clone(),
            data_layer: DataLayer::default(),
        }
    }

    pub fn data_layer(&self) -> &DataLayer {
        &self.data_layer
    }
}

#[async_trait]
impl ScriptLoader for RemoteTagLoader {
    fn name(&self) -> &str {
        "remote-tag"
    }

    async fn load(&self, settings: &TagSettings) -> Result<(), AnalyticsError> {
        let url = script_src(&self.script_url, &settings.measurement_id)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalyticsError::LoadFailure(format!(
                "tag script returned HTTP {status}"
            )));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(AnalyticsError::LoadFailure("tag script was empty".into()));
        }

        self.data_layer
            .push(json!(["js", chrono::Utc::now().to_rfc3339()]));
        self.data_layer.push(json!([
            "config",
            settings.measurement_id,
            settings.config_params()
        ]));
        tracing::info!(
            measurement_id = %settings.measurement_id,
            bytes = body.len(),
            "analytics tag loaded"
        );
        Ok(())
    }
}

/// Tag script URL with the measurement id attached.
pub fn script_src(script_url: &str, measurement_id: &str) -> Result<Url, AnalyticsError> {
    let mut url = Url::parse(script_url)?;
    url.query_pairs_mut().append_pair("id", measurement_id);
    Ok(url)
}

/// `<head>` markup that mounts the tag in a rendered page.
pub fn render_head_snippet(
    script_url: &str,
    settings: &TagSettings,
) -> Result<String, AnalyticsError> {
    let src = script_src(script_url, &settings.measurement_id)?;
    let id = serde_json::to_string(&settings.measurement_id)
        .map_err(|e| AnalyticsError::LoadFailure(e.to_string()))?;
    Ok(format!(
        "<script async src=\"{src}\"></script>\n\
         <script>\n\
         window.dataLayer = window.dataLayer || [];\n\
         function gtag(){{dataLayer.push(arguments);}}\n\
         gtag('js', new Date());\n\
         gtag('config', {id}, {params});\n\
         </script>\n",
        params = settings.config_params()
    ))
}
