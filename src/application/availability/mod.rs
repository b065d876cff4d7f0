pub mod engine;
pub mod pricing;

pub use engine::{AvailabilityEngine, UnitTypeAvailability};
pub use pricing::quote;
