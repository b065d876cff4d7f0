//! Real-time notifications
//!
//! Fire-and-forget event fan-out to WebSocket clients. Not part of the
//! admission contract: a publish failure never fails a booking.

pub mod event_bus;
pub mod events;

pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use events::{Event, EventMessage};
