//! Database entities module

pub mod reservation;
pub mod unit_type;

pub use reservation::Entity as Reservation;
pub use unit_type::Entity as UnitType;
