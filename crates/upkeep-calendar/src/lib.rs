//! Calendar event model and recurrence expansion.
//!
//! Event definitions are read-only templates. Expanding one against a display
//! window yields ephemeral [`EventInstance`]s that are never persisted.

pub mod expand;
pub mod frequency;
pub mod model;
pub mod present;
pub mod window;

pub use expand::{Recurrences, expand};
pub use frequency::RecurFrequency;
pub use model::{EventDefinition, EventInstance, NewEventDefinition};
pub use window::Window;
