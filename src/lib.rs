#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod analytics;
pub mod config;
pub mod consent;
pub mod error;
pub mod shell;
pub mod surfaces;

pub use analytics::AnalyticsGateway;
pub use config::Config;
pub use consent::{
    Category, ConsentChoice, ConsentController, ConsentPhase, ConsentRecord, ConsentStore,
};
pub use error::{AnalyticsError, ConfigError, StoreError};
pub use shell::PageShell;
