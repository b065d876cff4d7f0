pub mod handlers;

pub use handlers::HealthAppState;
