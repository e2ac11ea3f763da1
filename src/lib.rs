//! Behavioral core of a desktop pet: status simulation, progression,
//! gesture recognition, animation arbitration and the timers that make
//! the pet act on its own. Rendering, persistence and the host window
//! plug in through the traits in [`ports`].

pub mod arbiter;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod inventory;
pub mod model;
pub mod ports;
pub mod progress;
pub mod scheduler;
pub mod sim;
pub mod storage;

pub use catalog::Catalog;
pub use engine::{EngineOptions, PetEngine};
pub use error::PetError;
pub use gesture::{GestureSignal, PointerEvent, PointerKind};
pub use model::{InteractionType, ItemKind, PetStatus, Rules};
pub use ports::{Frame, HostCommand, Notification, NotificationKind, PetStore, RenderSink};
pub use storage::JsonFileStore;
