use thiserror::Error;

// ─── Error hierarchy ─────────────────────────────────────────────────────────
//
// Each subsystem defines its own error enum. None of these ever reach the
// visitor: the controller and page shell log them and fall back to the safest
// default (no consent assumed, no analytics, keep prompting).

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Storage errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    /// The durable medium cannot be read or written (disabled, quota, permissions).
    #[error("storage backend {backend} unavailable: {message}")]
    Unavailable { backend: String, message: String },

    /// A stored value exists but is not a valid consent record.
    #[error("malformed consent record: {0}")]
    Malformed(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn unavailable(backend: &str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            backend: backend.to_string(),
            message: message.into(),
        }
    }
}

// ─── Analytics errors ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("tag script failed to load: {0}")]
    LoadFailure(String),

    #[error("tag request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid tag script url: {0}")]
    Url(#[from] url::ParseError),
}
