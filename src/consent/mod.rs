pub mod controller;
pub mod events;
pub mod factory;
pub mod model;
pub mod storage;
pub mod store;

pub use controller::{ConsentController, ConsentPhase, DecisionOutcome};
pub use events::{CONSENT_UPDATED_EVENT, ConsentEvent, EventReceiver, EventSender};
pub use factory::build_controller;
pub use model::{
    Category, ConsentChoice, ConsentRecord, allows_analytics, normalize, normalize_at,
};
pub use storage::{FileStorage, InMemoryStorage, KeyValueStorage, create_storage};
pub use store::ConsentStore;
