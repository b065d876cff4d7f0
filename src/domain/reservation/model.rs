//! Reservation domain entity

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    /// Admitted but not yet confirmed by staff/payment
    Pending,
    /// Confirmed by staff or payment
    Confirmed,
    /// Cancelled by guest, staff or the hold-expiry sweeper (terminal)
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "Confirmed" => Self::Confirmed,
            _ => Self::Cancelled,
        }
    }

    /// Only Pending and Confirmed reservations hold a unit.
    pub fn counts_against_capacity(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Half-open booking window `[start, end)`.
///
/// The exclusive end makes back-to-back bookings legal: a window ending at
/// 11:00 never conflicts with one starting at 11:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl BookingWindow {
    /// Build a window, rejecting `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<Self> {
        if end <= start {
            return Err(DomainError::InvalidWindow(format!(
                "end ({}) must be after start ({})",
                end.to_rfc3339(),
                start.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Half-open overlap test: `a.start < b.end AND a.end > b.start`.
    pub fn overlaps(&self, other: &BookingWindow) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Whether the instant falls inside the window (start inclusive,
    /// end exclusive).
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// A reservation of one unit of a unit type for a booking window.
///
/// Reservations are never deleted; cancellation is a status change so the
/// record survives for audit/history.
#[derive(Debug, Clone)]
pub struct Reservation {
    /// Opaque unique ID
    pub id: String,
    /// Unit type this reservation holds a unit of
    pub unit_type_id: i32,
    /// Booking window, half-open
    pub window: BookingWindow,
    /// Occupants requested
    pub party_size: u32,
    /// Current status
    pub status: ReservationStatus,
    /// When the reservation was created
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(unit_type_id: i32, window: BookingWindow, party_size: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            unit_type_id,
            window,
            party_size,
            status: ReservationStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// `Pending -> Confirmed`. Confirming a confirmed reservation is a
    /// no-op; there is no way back out of Cancelled.
    pub fn confirm(&mut self) -> DomainResult<()> {
        match self.status {
            ReservationStatus::Pending => {
                self.status = ReservationStatus::Confirmed;
                Ok(())
            }
            ReservationStatus::Confirmed => Ok(()),
            ReservationStatus::Cancelled => Err(DomainError::Validation(format!(
                "reservation {} is cancelled and cannot be confirmed",
                self.id
            ))),
        }
    }

    /// `Pending | Confirmed -> Cancelled`. Idempotent: cancelling an
    /// already-cancelled reservation changes nothing.
    pub fn cancel(&mut self) {
        self.status = ReservationStatus::Cancelled;
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == ReservationStatus::Cancelled
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap()
    }

    fn window(start_hour: u32, end_hour: u32) -> BookingWindow {
        BookingWindow::new(at(start_hour), at(end_hour)).unwrap()
    }

    #[test]
    fn empty_window_is_rejected() {
        let err = BookingWindow::new(at(10), at(10)).unwrap_err();
        assert_eq!(err.reason_code(), "invalid_window");
    }

    #[test]
    fn reversed_window_is_rejected() {
        let err = BookingWindow::new(at(11), at(10)).unwrap_err();
        assert_eq!(err.reason_code(), "invalid_window");
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = window(10, 12);
        let b = window(11, 13);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn back_to_back_windows_do_not_overlap() {
        let morning = window(10, 11);
        let noon = window(11, 12);
        assert!(!morning.overlaps(&noon));
        assert!(!noon.overlaps(&morning));
    }

    #[test]
    fn containment_is_start_inclusive_end_exclusive() {
        let w = window(10, 11);
        assert!(w.contains(at(10)));
        assert!(!w.contains(at(11)));
    }

    #[test]
    fn new_reservation_is_pending() {
        let r = Reservation::new(1, window(10, 12), 2);
        assert_eq!(r.status, ReservationStatus::Pending);
        assert!(r.status.counts_against_capacity());
    }

    #[test]
    fn confirm_then_cancel() {
        let mut r = Reservation::new(1, window(10, 12), 2);
        r.confirm().unwrap();
        assert_eq!(r.status, ReservationStatus::Confirmed);
        r.cancel();
        assert_eq!(r.status, ReservationStatus::Cancelled);
        assert!(!r.status.counts_against_capacity());
    }

    #[test]
    fn confirm_is_idempotent_for_confirmed() {
        let mut r = Reservation::new(1, window(10, 12), 2);
        r.confirm().unwrap();
        r.confirm().unwrap();
        assert_eq!(r.status, ReservationStatus::Confirmed);
    }

    #[test]
    fn cancelled_cannot_be_confirmed() {
        let mut r = Reservation::new(1, window(10, 12), 2);
        r.cancel();
        assert!(r.confirm().is_err());
        assert_eq!(r.status, ReservationStatus::Cancelled);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut r = Reservation::new(1, window(10, 12), 2);
        r.cancel();
        r.cancel();
        assert_eq!(r.status, ReservationStatus::Cancelled);
    }

    #[test]
    fn status_display_roundtrip() {
        for status in &[
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Cancelled,
        ] {
            let parsed = ReservationStatus::from_str(status.as_str());
            assert_eq!(&parsed, status);
        }
    }

    #[test]
    fn unknown_status_defaults_to_cancelled() {
        // Failing closed: an unreadable status row must never hold a unit.
        let s = ReservationStatus::from_str("Garbled");
        assert_eq!(s, ReservationStatus::Cancelled);
    }
}
