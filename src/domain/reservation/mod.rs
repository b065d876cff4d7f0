pub mod model;
pub mod repository;

pub use model::{BookingWindow, Reservation, ReservationStatus};
pub use repository::ReservationStore;
