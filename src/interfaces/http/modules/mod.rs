//! HTTP modules: one directory per resource, DTOs next to handlers.

pub mod availability;
pub mod events;
pub mod health;
pub mod metrics;
pub mod reservations;
pub mod unit_types;
