pub mod hold_expiry;

pub use hold_expiry::start_hold_expiry_task;
