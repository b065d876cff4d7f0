//! Unit type domain entity

use chrono::{DateTime, Utc};

/// What kind of bookable thing a unit type is.
///
/// The two kinds carry different data: hotel room types have a pool of
/// interchangeable physical rooms, meeting rooms are a single unit hired
/// by the hour. Keeping them as variants makes a "meeting room with an
/// inventory count" unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitKind {
    /// Hotel room type with `inventory_count` interchangeable rooms
    RoomType { inventory_count: u32 },
    /// A single meeting room hired by the hour
    MeetingRoom { hourly_rate_cents: i64 },
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoomType { .. } => "RoomType",
            Self::MeetingRoom { .. } => "MeetingRoom",
        }
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A category of bookable unit: a hotel room type or a meeting room.
///
/// `capacity` and the kind payload are immutable after creation; inventory
/// changes are an administrative concern outside this service.
#[derive(Debug, Clone)]
pub struct UnitType {
    /// Catalog-assigned ID
    pub id: i32,
    /// Display name ("Standard Room", "Boardroom 4F")
    pub name: String,
    /// Maximum occupants per unit
    pub capacity: u32,
    pub kind: UnitKind,
    /// Inactive unit types are never offered
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl UnitType {
    /// Number of interchangeable physical units. Meeting rooms are always
    /// a single unit, which turns the capacity comparison in the engine
    /// into a pure overlap conflict.
    pub fn unit_count(&self) -> u32 {
        match self.kind {
            UnitKind::RoomType { inventory_count } => inventory_count,
            UnitKind::MeetingRoom { .. } => 1,
        }
    }

    /// Whether a party of the given size fits one unit.
    pub fn accommodates(&self, party_size: u32) -> bool {
        party_size <= self.capacity
    }

    pub fn is_meeting_room(&self) -> bool {
        matches!(self.kind, UnitKind::MeetingRoom { .. })
    }

    pub fn hourly_rate_cents(&self) -> Option<i64> {
        match self.kind {
            UnitKind::MeetingRoom { hourly_rate_cents } => Some(hourly_rate_cents),
            UnitKind::RoomType { .. } => None,
        }
    }
}

/// Creation payload for the catalog; the store assigns the ID.
#[derive(Debug, Clone)]
pub struct NewUnitType {
    pub name: String,
    pub capacity: u32,
    pub kind: UnitKind,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn room_type(inventory: u32, capacity: u32) -> UnitType {
        UnitType {
            id: 1,
            name: "Standard Room".to_string(),
            capacity,
            kind: UnitKind::RoomType {
                inventory_count: inventory,
            },
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn room_type_unit_count_is_inventory() {
        assert_eq!(room_type(12, 2).unit_count(), 12);
    }

    #[test]
    fn meeting_room_unit_count_is_one() {
        let room = UnitType {
            id: 2,
            name: "Boardroom 4F".to_string(),
            capacity: 10,
            kind: UnitKind::MeetingRoom {
                hourly_rate_cents: 4500,
            },
            is_active: true,
            created_at: Utc::now(),
        };
        assert_eq!(room.unit_count(), 1);
        assert!(room.is_meeting_room());
        assert_eq!(room.hourly_rate_cents(), Some(4500));
    }

    #[test]
    fn accommodates_compares_against_capacity() {
        let ut = room_type(5, 2);
        assert!(ut.accommodates(1));
        assert!(ut.accommodates(2));
        assert!(!ut.accommodates(3));
    }

    #[test]
    fn room_type_has_no_hourly_rate() {
        assert_eq!(room_type(5, 2).hourly_rate_cents(), None);
    }
}
