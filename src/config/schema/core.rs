use super::{AnalyticsConfig, ControllerConfig, ObservabilityConfig, StorageConfig};
use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub analytics: AnalyticsConfig,

    #[serde(default)]
    pub controller: ControllerConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    pub fn load_or_init() -> Result<Self, ConfigError> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .ok_or_else(|| ConfigError::Load("could not find home directory".into()))?;
        Self::load_or_init_in(&home.join(".siteconsent"))
    }

    /// Load `config.toml` from `dir`, writing defaults on first run.
    pub fn load_or_init_in(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join("config.toml");

        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)?;
            let mut config: Config = toml::from_str(&contents).map_err(|e| {
                ConfigError::Load(format!("{}: {e}", config_path.display()))
            })?;
            config.config_path.clone_from(&config_path);
            config.validate()?;
            Ok(config)
        } else {
            let config = Self {
                config_path,
                ..Self::default()
            };
            config.validate()?;
            config.save()?;
            Ok(config)
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    pub(crate) fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup("SITECONSENT_MEASUREMENT_ID") {
            if !id.trim().is_empty() {
                self.analytics.measurement_id = Some(id.trim().to_string());
            }
        }

        if let Some(backend) = lookup("SITECONSENT_STORAGE_BACKEND") {
            if !backend.trim().is_empty() {
                self.storage.backend = backend.trim().to_ascii_lowercase();
            }
        }

        if let Some(level) = lookup("SITECONSENT_LOG_LEVEL") {
            if !level.trim().is_empty() {
                self.observability.log_level = level.trim().to_ascii_lowercase();
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "storage.key must not be empty".into(),
            ));
        }

        match url::Url::parse(&self.analytics.script_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => {
                return Err(ConfigError::Validation(format!(
                    "analytics.script_url must use http or https, got '{}'",
                    parsed.scheme()
                )));
            }
            Err(e) => {
                return Err(ConfigError::Validation(format!(
                    "analytics.script_url is not a valid url: {e}"
                )));
            }
        }

        if self.controller.event_capacity == 0 {
            return Err(ConfigError::Validation(
                "controller.event_capacity must be greater than 0".into(),
            ));
        }

        if self.observability.level().is_none() {
            return Err(ConfigError::Validation(format!(
                "observability.log_level '{}' is not a known level",
                self.observability.log_level
            )));
        }

        Ok(())
    }

    /// Directory used by the file storage backend.
    pub fn storage_dir(&self) -> PathBuf {
        if let Some(dir) = &self.storage.dir {
            return dir.clone();
        }
        self.config_path
            .parent()
            .map_or_else(|| PathBuf::from("storage"), |p| p.join("storage"))
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Load(format!("failed to serialize config: {e}")))?;
        fs::write(&self.config_path, toml_str)?;
        Ok(())
    }
}
