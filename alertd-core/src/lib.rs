// alertd core library
// Records alerts raised by other services and dispatches them to their targets

pub mod engine;
pub mod model;
pub mod notifier;
pub mod store;

pub use engine::{AlertEngine, EngineConfig, EngineError};
pub use model::{
    Alert, AlertStatus, InvalidAlert, NewAlert, PendingAlert, Severity, TransitionError, MAX_ERROR_MESSAGE_LEN,
    MAX_MESSAGE_LEN,
};
pub use notifier::{create_notifier, LogNotifier, Notifier, NotifyError, StaticNotifier};
pub use store::{AlertStore, MemoryAlertStore, StoreError};

#[cfg(feature = "sqlite")]
pub use store::SqliteAlertStore;
#[cfg(feature = "webhook")]
pub use notifier::WebhookNotifier;
