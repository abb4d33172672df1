//! Event bus for gitcanvas.
//!
//! Independent UI regions do not hold references to each other; they publish
//! and subscribe on this bus instead. Delivery is fan-out with no replay:
//! consumers that mount late are expected to read persisted state directly
//! rather than rely on having seen earlier events.

mod bus;
mod events;

pub use bus::{BroadcastBus, EventBus};
pub use events::Event;
