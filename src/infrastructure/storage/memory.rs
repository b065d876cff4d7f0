//! In-memory storage implementation
//!
//! Backs tests and local development; the same trait surface as the
//! SeaORM stores, minus persistence.

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::domain::{
    BookingWindow, DomainError, DomainResult, NewUnitType, Reservation, ReservationStatus,
    ReservationStore, RepositoryProvider, UnitType, UnitTypeCatalog,
};

/// In-memory stores for development and testing
pub struct InMemoryRepositoryProvider {
    unit_types: DashMap<i32, UnitType>,
    reservations: DashMap<String, Reservation>,
    unit_type_counter: AtomicI32,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self {
            unit_types: DashMap::new(),
            reservations: DashMap::new(),
            unit_type_counter: AtomicI32::new(1),
        }
    }

    /// Test helper: rewrite a reservation's creation timestamp so the
    /// hold-expiry cutoff can be exercised without sleeping.
    pub fn backdate(&self, reservation_id: &str, created_at: DateTime<Utc>) {
        if let Some(mut r) = self.reservations.get_mut(reservation_id) {
            r.created_at = created_at;
        }
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn unit_types(&self) -> &dyn UnitTypeCatalog {
        self
    }

    fn reservations(&self) -> &dyn ReservationStore {
        self
    }
}

// ── UnitTypeCatalog impl ────────────────────────────────────────

#[async_trait]
impl UnitTypeCatalog for InMemoryRepositoryProvider {
    async fn insert(&self, new: NewUnitType) -> DomainResult<UnitType> {
        let id = self.unit_type_counter.fetch_add(1, Ordering::SeqCst);
        let unit_type = UnitType {
            id,
            name: new.name,
            capacity: new.capacity,
            kind: new.kind,
            is_active: true,
            created_at: Utc::now(),
        };
        self.unit_types.insert(id, unit_type.clone());
        Ok(unit_type)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<UnitType>> {
        Ok(self.unit_types.get(&id).map(|ut| ut.value().clone()))
    }

    async fn find_active(&self) -> DomainResult<Vec<UnitType>> {
        let mut active: Vec<UnitType> = self
            .unit_types
            .iter()
            .filter(|entry| entry.is_active)
            .map(|entry| entry.value().clone())
            .collect();
        active.sort_by_key(|ut| ut.id);
        Ok(active)
    }

    async fn find_page(&self, page: u64, limit: u64) -> DomainResult<(Vec<UnitType>, u64)> {
        let mut all: Vec<UnitType> = self.unit_types.iter().map(|e| e.value().clone()).collect();
        all.sort_by_key(|ut| ut.id);
        let total = all.len() as u64;
        let limit = limit.max(1) as usize;
        let offset = (page.max(1) - 1) as usize * limit;
        let items = all.into_iter().skip(offset).take(limit).collect();
        Ok((items, total))
    }

    async fn deactivate(&self, id: i32) -> DomainResult<()> {
        let Some(mut unit_type) = self.unit_types.get_mut(&id) else {
            return Err(DomainError::NotFound {
                entity: "UnitType",
                field: "id",
                value: id.to_string(),
            });
        };
        unit_type.is_active = false;
        Ok(())
    }
}

// ── ReservationStore impl ───────────────────────────────────────

#[async_trait]
impl ReservationStore for InMemoryRepositoryProvider {
    async fn insert(&self, reservation: Reservation) -> DomainResult<()> {
        if self.reservations.contains_key(&reservation.id) {
            return Err(DomainError::Conflict(format!(
                "reservation {} already exists",
                reservation.id
            )));
        }
        self.reservations.insert(reservation.id.clone(), reservation);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.get(id).map(|r| r.value().clone()))
    }

    async fn count_overlapping(
        &self,
        unit_type_id: i32,
        window: &BookingWindow,
    ) -> DomainResult<u32> {
        let count = self
            .reservations
            .iter()
            .filter(|r| {
                r.unit_type_id == unit_type_id
                    && r.status.counts_against_capacity()
                    && r.window.overlaps(window)
            })
            .count();
        Ok(count as u32)
    }

    async fn update_status(&self, id: &str, status: ReservationStatus) -> DomainResult<()> {
        let Some(mut reservation) = self.reservations.get_mut(id) else {
            return Err(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            });
        };
        reservation.status = status;
        Ok(())
    }

    async fn find_by_unit_type(&self, unit_type_id: i32) -> DomainResult<Vec<Reservation>> {
        let mut matching: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| r.unit_type_id == unit_type_id)
            .map(|r| r.value().clone())
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn find_page(&self, page: u64, limit: u64) -> DomainResult<(Vec<Reservation>, u64)> {
        let mut all: Vec<Reservation> = self.reservations.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = all.len() as u64;
        let limit = limit.max(1) as usize;
        let offset = (page.max(1) - 1) as usize * limit;
        let items = all.into_iter().skip(offset).take(limit).collect();
        Ok((items, total))
    }

    async fn find_stale_pending(
        &self,
        cutoff: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .iter()
            .filter(|r| r.status == ReservationStatus::Pending && r.created_at < cutoff)
            .map(|r| r.value().clone())
            .collect())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UnitKind;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 10, hour, 0, 0).unwrap()
    }

    fn window(start_hour: u32, end_hour: u32) -> BookingWindow {
        BookingWindow::new(at(start_hour), at(end_hour)).unwrap()
    }

    fn reservation(unit_type_id: i32, w: BookingWindow) -> Reservation {
        Reservation::new(unit_type_id, w, 2)
    }

    #[tokio::test]
    async fn count_overlapping_applies_half_open_boundaries() {
        let store = InMemoryRepositoryProvider::new();
        store
            .reservations()
            .insert(reservation(1, window(10, 12)))
            .await
            .unwrap();

        // Touching at the boundary is not an overlap.
        assert_eq!(store.count_overlapping(1, &window(8, 10)).await.unwrap(), 0);
        assert_eq!(store.count_overlapping(1, &window(12, 14)).await.unwrap(), 0);
        // Any shared instant is.
        assert_eq!(store.count_overlapping(1, &window(9, 11)).await.unwrap(), 1);
        assert_eq!(store.count_overlapping(1, &window(11, 13)).await.unwrap(), 1);
        assert_eq!(store.count_overlapping(1, &window(10, 12)).await.unwrap(), 1);
        // Other unit types are unaffected.
        assert_eq!(store.count_overlapping(2, &window(10, 12)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn cancelled_reservations_do_not_count() {
        let store = InMemoryRepositoryProvider::new();
        let r = reservation(1, window(10, 12));
        let id = r.id.clone();
        store.reservations().insert(r).await.unwrap();

        store
            .update_status(&id, ReservationStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(store.count_overlapping(1, &window(10, 12)).await.unwrap(), 0);

        // Confirmed ones do.
        let r2 = reservation(1, window(10, 12));
        let id2 = r2.id.clone();
        store.reservations().insert(r2).await.unwrap();
        store
            .update_status(&id2, ReservationStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(store.count_overlapping(1, &window(10, 12)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_conflict() {
        let store = InMemoryRepositoryProvider::new();
        let r = reservation(1, window(10, 12));
        store.reservations().insert(r.clone()).await.unwrap();
        let err = store.reservations().insert(r).await.unwrap_err();
        assert_eq!(err.reason_code(), "conflict");
    }

    #[tokio::test]
    async fn catalog_assigns_sequential_ids_and_deactivates() {
        let store = InMemoryRepositoryProvider::new();
        let a = store
            .unit_types()
            .insert(NewUnitType {
                name: "Standard".into(),
                capacity: 2,
                kind: UnitKind::RoomType { inventory_count: 3 },
            })
            .await
            .unwrap();
        let b = store
            .unit_types()
            .insert(NewUnitType {
                name: "Boardroom".into(),
                capacity: 8,
                kind: UnitKind::MeetingRoom {
                    hourly_rate_cents: 4500,
                },
            })
            .await
            .unwrap();
        assert!(a.id < b.id);

        store.unit_types().deactivate(a.id).await.unwrap();
        let active = store.unit_types().find_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, b.id);
    }

    #[tokio::test]
    async fn stale_pending_respects_status_and_cutoff() {
        let store = InMemoryRepositoryProvider::new();
        let pending = reservation(1, window(10, 12));
        let confirmed = reservation(1, window(12, 14));
        let pending_id = pending.id.clone();
        let confirmed_id = confirmed.id.clone();
        store.reservations().insert(pending).await.unwrap();
        store.reservations().insert(confirmed).await.unwrap();
        store
            .update_status(&confirmed_id, ReservationStatus::Confirmed)
            .await
            .unwrap();

        let past = Utc::now() - chrono::Duration::hours(1);
        store.backdate(&pending_id, past);
        store.backdate(&confirmed_id, past);

        let stale = store.find_stale_pending(Utc::now()).await.unwrap();
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].id, pending_id);
    }
}
