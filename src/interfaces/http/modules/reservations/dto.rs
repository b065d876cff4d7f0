//! Reservation DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Reservation;

/// Request to admit a new reservation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    /// Unit type to book one unit of
    pub unit_type_id: i32,
    /// Window start (ISO 8601)
    pub window_start: DateTime<Utc>,
    /// Window end (ISO 8601, exclusive)
    pub window_end: DateTime<Utc>,
    /// Occupants
    #[validate(range(min = 1, max = 64))]
    #[serde(default = "default_party_size")]
    pub party_size: u32,
}

fn default_party_size() -> u32 {
    1
}

/// Reservation details in API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationDto {
    pub id: String,
    pub unit_type_id: i32,
    pub window_start: String,
    pub window_end: String,
    pub party_size: u32,
    /// "Pending", "Confirmed" or "Cancelled"
    pub status: String,
    pub created_at: String,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            unit_type_id: r.unit_type_id,
            window_start: r.window.start().to_rfc3339(),
            window_end: r.window.end().to_rfc3339(),
            party_size: r.party_size,
            status: r.status.as_str().to_string(),
            created_at: r.created_at.to_rfc3339(),
        }
    }
}
