pub mod errors;
pub mod events;
pub mod types;

pub use errors::{BridgeError, ConfigError, EngineError};
pub use events::{HostLifecycleEvent, LifecycleBus};
pub use types::{EngineKind, Orientation, Rect, WidgetId};

pub type Result<T> = std::result::Result<T, BridgeError>;
