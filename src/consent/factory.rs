use super::controller::ConsentController;
use super::storage::create_storage;
use super::store::ConsentStore;
use crate::analytics::{AnalyticsGateway, RemoteTagLoader, ScriptLoader};
use crate::config::Config;

use std::sync::Arc;

/// Wire a controller from config: storage backend, remote tag loader, one
/// shared gateway.
pub fn build_controller(config: &Config) -> ConsentController {
    let loader: Arc<dyn ScriptLoader> = Arc::new(RemoteTagLoader::new(&config.analytics));
    build_controller_with_loader(config, loader)
}

/// Same as [`build_controller`] with a caller-supplied tag loader.
pub fn build_controller_with_loader(
    config: &Config,
    loader: Arc<dyn ScriptLoader>,
) -> ConsentController {
    let storage = create_storage(&config.storage, &config.storage_dir());
    let store = ConsentStore::new(storage, config.storage.key.clone());
    let gateway = Arc::new(AnalyticsGateway::from_config(loader, &config.analytics));

    let controller = ConsentController::new(store, gateway, &config.controller);
    match config.analytics.measurement_id() {
        Some(id) => controller.with_measurement_id(id),
        None => controller,
    }
}
