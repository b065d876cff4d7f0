//! Reservation store interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{BookingWindow, Reservation, ReservationStatus};
use crate::domain::DomainResult;

/// Persistent store for reservations.
///
/// The store is the single source of truth for capacity; the availability
/// engine never caches counts across calls. Implementations must apply the
/// half-open overlap test (`existing.start < window.end AND existing.end >
/// window.start`) and count only Pending/Confirmed rows.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Insert a new reservation
    async fn insert(&self, reservation: Reservation) -> DomainResult<()>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>>;

    /// Count Pending/Confirmed reservations of the unit type whose window
    /// overlaps the given one
    async fn count_overlapping(
        &self,
        unit_type_id: i32,
        window: &BookingWindow,
    ) -> DomainResult<u32>;

    /// Update the status of an existing reservation
    async fn update_status(&self, id: &str, status: ReservationStatus) -> DomainResult<()>;

    /// All reservations of a unit type (any status), newest first
    async fn find_by_unit_type(&self, unit_type_id: i32) -> DomainResult<Vec<Reservation>>;

    /// One page of reservations (any status), newest first, plus the total
    /// row count
    async fn find_page(&self, page: u64, limit: u64) -> DomainResult<(Vec<Reservation>, u64)>;

    /// Pending reservations created before the cutoff; fodder for the
    /// hold-expiry sweeper
    async fn find_stale_pending(&self, cutoff: DateTime<Utc>) -> DomainResult<Vec<Reservation>>;
}
