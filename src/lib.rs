//! # Roomly Booking Service
//!
//! Room and meeting-room booking backend with strict admission control.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, types and store traits
//! - **application**: The availability engine, pricing and background services
//! - **infrastructure**: External concerns (database, migrations, in-memory storage)
//! - **interfaces**: REST API with Swagger documentation
//! - **notifications**: Real-time WebSocket notifications for UI
//! - **shared**: Shutdown coordination and retry helpers

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod notifications;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::create_api_router;

// Re-export notifications
pub use notifications::{create_event_bus, Event, EventBus, SharedEventBus};
