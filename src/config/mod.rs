pub mod schema;

pub use schema::{AnalyticsConfig, Config, ControllerConfig, ObservabilityConfig, StorageConfig};
