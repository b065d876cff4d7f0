//! Unit type DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{DomainError, DomainResult, NewUnitType, UnitKind, UnitType};

/// Unit kind discriminator in API payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UnitKindDto {
    RoomType,
    MeetingRoom,
}

/// Request to create a new unit type
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUnitTypeRequest {
    /// Display name
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    /// Maximum occupants per unit
    #[validate(range(min = 1, max = 64))]
    pub capacity: u32,
    pub kind: UnitKindDto,
    /// Required for room types; ignored for meeting rooms
    pub inventory_count: Option<u32>,
    /// Required for meeting rooms (cents per hour); ignored for room types
    pub hourly_rate_cents: Option<i64>,
}

impl CreateUnitTypeRequest {
    /// Cross-field validation the derive cannot express: each kind
    /// requires its own payload field.
    pub fn into_domain(self) -> DomainResult<NewUnitType> {
        let kind = match self.kind {
            UnitKindDto::RoomType => {
                let inventory_count = self.inventory_count.ok_or_else(|| {
                    DomainError::Validation(
                        "inventory_count is required for room types".to_string(),
                    )
                })?;
                UnitKind::RoomType { inventory_count }
            }
            UnitKindDto::MeetingRoom => {
                let hourly_rate_cents = self.hourly_rate_cents.ok_or_else(|| {
                    DomainError::Validation(
                        "hourly_rate_cents is required for meeting rooms".to_string(),
                    )
                })?;
                if hourly_rate_cents < 0 {
                    return Err(DomainError::Validation(
                        "hourly_rate_cents must not be negative".to_string(),
                    ));
                }
                UnitKind::MeetingRoom { hourly_rate_cents }
            }
        };
        Ok(NewUnitType {
            name: self.name,
            capacity: self.capacity,
            kind,
        })
    }
}

/// Unit type details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct UnitTypeDto {
    pub id: i32,
    pub name: String,
    pub capacity: u32,
    /// "RoomType" or "MeetingRoom"
    pub kind: String,
    /// Interchangeable physical units (1 for meeting rooms)
    pub unit_count: u32,
    pub hourly_rate_cents: Option<i64>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<UnitType> for UnitTypeDto {
    fn from(ut: UnitType) -> Self {
        Self {
            id: ut.id,
            name: ut.name.clone(),
            capacity: ut.capacity,
            kind: ut.kind.as_str().to_string(),
            unit_count: ut.unit_count(),
            hourly_rate_cents: ut.hourly_rate_cents(),
            is_active: ut.is_active,
            created_at: ut.created_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_type_requires_inventory_count() {
        let req = CreateUnitTypeRequest {
            name: "Standard Room".into(),
            capacity: 2,
            kind: UnitKindDto::RoomType,
            inventory_count: None,
            hourly_rate_cents: None,
        };
        assert_eq!(req.into_domain().unwrap_err().reason_code(), "validation");
    }

    #[test]
    fn meeting_room_requires_non_negative_rate() {
        let req = CreateUnitTypeRequest {
            name: "Boardroom".into(),
            capacity: 8,
            kind: UnitKindDto::MeetingRoom,
            inventory_count: None,
            hourly_rate_cents: Some(-1),
        };
        assert_eq!(req.into_domain().unwrap_err().reason_code(), "validation");
    }

    #[test]
    fn irrelevant_fields_are_ignored_per_kind() {
        let req = CreateUnitTypeRequest {
            name: "Boardroom".into(),
            capacity: 8,
            kind: UnitKindDto::MeetingRoom,
            inventory_count: Some(99),
            hourly_rate_cents: Some(4500),
        };
        let new = req.into_domain().unwrap();
        assert_eq!(
            new.kind,
            UnitKind::MeetingRoom {
                hourly_rate_cents: 4500
            }
        );
    }
}
