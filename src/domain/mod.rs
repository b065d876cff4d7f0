pub mod error;
pub mod repositories;
pub mod reservation;
pub mod unit_type;

// Re-export commonly used types
pub use error::{DomainError, DomainResult};
pub use repositories::RepositoryProvider;
pub use reservation::{BookingWindow, Reservation, ReservationStatus, ReservationStore};
pub use unit_type::{NewUnitType, UnitKind, UnitType, UnitTypeCatalog};
