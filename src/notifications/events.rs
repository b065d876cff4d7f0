//! Notification events
//!
//! Defines the event types broadcast to WebSocket clients after
//! reservation and catalog changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event types for notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// A reservation was admitted (capacity check passed, row inserted)
    ReservationAdmitted(ReservationAdmittedEvent),
    /// A pending reservation was confirmed
    ReservationConfirmed(ReservationLifecycleEvent),
    /// A reservation was cancelled (guest, staff or hold expiry)
    ReservationCancelled(ReservationLifecycleEvent),
    /// A unit type was created or deactivated
    UnitTypeChanged(UnitTypeChangedEvent),
}

impl Event {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::ReservationAdmitted(_) => "reservation_admitted",
            Event::ReservationConfirmed(_) => "reservation_confirmed",
            Event::ReservationCancelled(_) => "reservation_cancelled",
            Event::UnitTypeChanged(_) => "unit_type_changed",
        }
    }

    /// Get the unit type ID the event concerns
    pub fn unit_type_id(&self) -> i32 {
        match self {
            Event::ReservationAdmitted(e) => e.unit_type_id,
            Event::ReservationConfirmed(e) => e.unit_type_id,
            Event::ReservationCancelled(e) => e.unit_type_id,
            Event::UnitTypeChanged(e) => e.unit_type_id,
        }
    }
}

/// Reservation admitted event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationAdmittedEvent {
    pub reservation_id: String,
    pub unit_type_id: i32,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub party_size: u32,
    pub timestamp: DateTime<Utc>,
}

/// Reservation confirmed/cancelled event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationLifecycleEvent {
    pub reservation_id: String,
    pub unit_type_id: i32,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Unit type created/deactivated event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitTypeChangedEvent {
    pub unit_type_id: i32,
    pub name: String,
    pub is_active: bool,
    pub timestamp: DateTime<Utc>,
}

/// Envelope carrying an event to subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}
