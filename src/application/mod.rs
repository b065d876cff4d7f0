//! Application layer: the availability engine, pricing, and background
//! services built on the domain repositories.

pub mod availability;
pub mod services;

pub use availability::{quote, AvailabilityEngine, UnitTypeAvailability};
pub use services::start_hold_expiry_task;
