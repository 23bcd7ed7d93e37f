//! Application layer: the conditions editor and its event bus
//!
//! This layer orchestrates domain logic; it performs no I/O.

pub mod editor;
pub mod error;
pub mod events;

pub use editor::{ConditionsEditor, EditorOptions};
pub use error::{ApplicationError, ApplicationResult};
pub use events::{ChangeCause, EditorEvent, EventBus, SubscriptionId, Topic};
