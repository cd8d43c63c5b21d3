mod analytics;
mod controller;
mod core;
mod observability;
mod storage;

pub use analytics::AnalyticsConfig;
pub use controller::ControllerConfig;
pub use core::Config;
pub use observability::ObservabilityConfig;
pub use storage::StorageConfig;
