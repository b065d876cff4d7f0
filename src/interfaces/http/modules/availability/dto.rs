//! Availability and quote DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::availability::UnitTypeAvailability;
use crate::interfaces::http::modules::unit_types::dto::UnitTypeDto;

/// Query for an availability check or search
#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailabilityQuery {
    /// Window start (ISO 8601)
    pub start: DateTime<Utc>,
    /// Window end (ISO 8601, exclusive)
    pub end: DateTime<Utc>,
    /// Occupants; unit types sized below this are never offered
    #[serde(default = "default_party_size")]
    pub party_size: u32,
}

fn default_party_size() -> u32 {
    1
}

/// Query for a meeting-room hire quote
#[derive(Debug, Deserialize, IntoParams)]
pub struct QuoteQuery {
    /// Window start (ISO 8601)
    pub start: DateTime<Utc>,
    /// Window end (ISO 8601, exclusive)
    pub end: DateTime<Utc>,
}

/// Remaining capacity of one unit type
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityDto {
    pub unit_type_id: i32,
    /// Free units for the requested window (0 = sold out or not offered)
    pub available: u32,
}

/// One row of a batch availability search
#[derive(Debug, Serialize, ToSchema)]
pub struct UnitTypeAvailabilityDto {
    pub unit_type: UnitTypeDto,
    pub available: u32,
}

impl From<UnitTypeAvailability> for UnitTypeAvailabilityDto {
    fn from(a: UnitTypeAvailability) -> Self {
        Self {
            unit_type: UnitTypeDto::from(a.unit_type),
            available: a.available,
        }
    }
}

/// Meeting-room hire quote
#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteDto {
    pub unit_type_id: i32,
    pub window_start: String,
    pub window_end: String,
    pub hourly_rate_cents: i64,
    /// Pro-rated total, rounded half-up to whole cents
    pub total_cents: i64,
}
