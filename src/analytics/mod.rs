pub mod gateway;
pub mod loader;

pub use gateway::AnalyticsGateway;
pub use loader::{DataLayer, RemoteTagLoader, ScriptLoader, TagSettings, render_head_snippet};
