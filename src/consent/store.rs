use super::model::ConsentRecord;
use super::storage::KeyValueStorage;
use crate::error::StoreError;
use chrono::DateTime;
use std::sync::Arc;

/// Durable home of the single consent record.
///
/// The only component that touches the storage medium. Malformed stored values
/// are reported as absent so the visitor is simply asked again.
#[derive(Clone)]
pub struct ConsentStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl ConsentStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &str {
        self.storage.name()
    }

    /// Previously stored record, or `None` when missing or malformed.
    ///
    /// Only an unusable medium is an error.
    pub fn load(&self) -> Result<Option<ConsentRecord>, StoreError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(None);
        };

        match parse_record(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "discarding stored consent record");
                Ok(None)
            }
        }
    }

    pub fn save(&self, record: &ConsentRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string(record)
            .map_err(|e| StoreError::Malformed(format!("failed to serialize record: {e}")))?;
        self.storage.set(&self.key, &json)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.storage.remove(&self.key)
    }

    /// Store arbitrary text under the consent key, bypassing validation.
    #[doc(hidden)]
    pub fn write_raw(&self, value: &str) -> Result<(), StoreError> {
        self.storage.set(&self.key, value)
    }
}

fn parse_record(raw: &str) -> Result<ConsentRecord, StoreError> {
    let record: ConsentRecord =
        serde_json::from_str(raw.trim()).map_err(|e| StoreError::Malformed(e.to_string()))?;
    if !record.necessary {
        return Err(StoreError::Malformed(
            "necessary cookies cannot be declined".into(),
        ));
    }
    if record.timestamp < 0 || DateTime::from_timestamp_millis(record.timestamp).is_none() {
        return Err(StoreError::Malformed(format!(
            "timestamp {} is out of range",
            record.timestamp
        )));
    }
    Ok(record)
}
