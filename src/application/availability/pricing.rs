//! Meeting-room hire quotes
//!
//! Pure arithmetic, no store access and no concurrency concerns.

use crate::domain::{BookingWindow, DomainError, DomainResult, UnitType};

/// Quote the hire cost for a meeting room over a window, in cents.
///
/// Pro-rated to the second against the hourly rate, rounded half-up to
/// whole cents. Room types are not priced by this service; quoting one is
/// a validation error.
pub fn quote(unit_type: &UnitType, window: &BookingWindow) -> DomainResult<i64> {
    let Some(rate_cents) = unit_type.hourly_rate_cents() else {
        return Err(DomainError::Validation(format!(
            "unit type {} ({}) is not a meeting room and has no hire rate",
            unit_type.id, unit_type.name
        )));
    };

    let seconds = window.duration().num_seconds();
    let total = (rate_cents as i128 * seconds as i128 + 1800) / 3600;
    Ok(total as i64)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UnitKind;
    use chrono::{TimeZone, Utc};

    fn meeting_room(rate_cents: i64) -> UnitType {
        UnitType {
            id: 9,
            name: "Boardroom 4F".to_string(),
            capacity: 8,
            kind: UnitKind::MeetingRoom {
                hourly_rate_cents: rate_cents,
            },
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn window(start_min: u32, end_min: u32) -> BookingWindow {
        let base = |m: u32| Utc.with_ymd_and_hms(2026, 5, 2, 9 + m / 60, m % 60, 0).unwrap();
        BookingWindow::new(base(start_min), base(end_min)).unwrap()
    }

    #[test]
    fn one_hour_costs_the_hourly_rate() {
        assert_eq!(quote(&meeting_room(4500), &window(0, 60)).unwrap(), 4500);
    }

    #[test]
    fn ninety_minutes_is_pro_rated() {
        assert_eq!(quote(&meeting_room(4500), &window(0, 90)).unwrap(), 6750);
    }

    #[test]
    fn twenty_minutes_is_pro_rated() {
        assert_eq!(quote(&meeting_room(4500), &window(0, 20)).unwrap(), 1500);
    }

    #[test]
    fn fractional_cents_round_half_up() {
        // 100 cents/h for 100 minutes = 166.66… cents -> 167
        assert_eq!(quote(&meeting_room(100), &window(0, 100)).unwrap(), 167);
        // 100 cents/h for 20 minutes = 33.33… cents -> 33
        assert_eq!(quote(&meeting_room(100), &window(0, 20)).unwrap(), 33);
    }

    #[test]
    fn room_types_have_no_quote() {
        let room = UnitType {
            id: 1,
            name: "Standard Room".to_string(),
            capacity: 2,
            kind: UnitKind::RoomType { inventory_count: 10 },
            is_active: true,
            created_at: Utc::now(),
        };
        let err = quote(&room, &window(0, 60)).unwrap_err();
        assert_eq!(err.reason_code(), "validation");
    }
}
