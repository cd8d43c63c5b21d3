use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_STORAGE_KEY: &str = "siteconsent.cookie-consent";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// "file" | "memory"
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    /// Key under which the consent record is stored
    #[serde(default = "default_storage_key")]
    pub key: String,
    /// Directory for the file backend (default: `<config dir>/storage`)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_storage_backend() -> String {
    "file".into()
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            key: default_storage_key(),
            dir: None,
        }
    }
}
