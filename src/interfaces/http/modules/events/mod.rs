pub mod handlers;

pub use handlers::{ws_events_handler, NotificationState};
