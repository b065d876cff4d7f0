//! SeaORM implementation of ReservationStore

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{
    BookingWindow, DomainError, DomainResult, Reservation, ReservationStatus, ReservationStore,
};
use crate::infrastructure::database::entities::reservation;

/// Status values that hold a unit; must match the half-open overlap count
/// in `count_overlapping`.
const ACTIVE_STATUSES: [&str; 2] = ["Pending", "Confirmed"];

pub struct SeaOrmReservationStore {
    db: DatabaseConnection,
}

impl SeaOrmReservationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    let window = BookingWindow::new(m.window_start, m.window_end).map_err(|_| {
        DomainError::Storage(format!(
            "reservation {} has a corrupt window: [{}, {})",
            m.id, m.window_start, m.window_end
        ))
    })?;
    Ok(Reservation {
        id: m.id,
        unit_type_id: m.unit_type_id,
        window,
        party_size: m.party_size.max(0) as u32,
        status: ReservationStatus::from_str(&m.status),
        created_at: m.created_at,
    })
}

fn domain_to_active(r: &Reservation) -> reservation::ActiveModel {
    reservation::ActiveModel {
        id: Set(r.id.clone()),
        unit_type_id: Set(r.unit_type_id),
        window_start: Set(r.window.start()),
        window_end: Set(r.window.end()),
        party_size: Set(r.party_size as i32),
        status: Set(r.status.as_str().to_string()),
        created_at: Set(r.created_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

// ── ReservationStore impl ───────────────────────────────────────

#[async_trait]
impl ReservationStore for SeaOrmReservationStore {
    async fn insert(&self, r: Reservation) -> DomainResult<()> {
        debug!("Inserting reservation: {}", r.id);
        domain_to_active(&r).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn count_overlapping(
        &self,
        unit_type_id: i32,
        window: &BookingWindow,
    ) -> DomainResult<u32> {
        // Half-open overlap: existing.start < window.end AND
        // existing.end > window.start
        let count = reservation::Entity::find()
            .filter(reservation::Column::UnitTypeId.eq(unit_type_id))
            .filter(reservation::Column::Status.is_in(ACTIVE_STATUSES))
            .filter(reservation::Column::WindowStart.lt(window.end()))
            .filter(reservation::Column::WindowEnd.gt(window.start()))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count as u32)
    }

    async fn update_status(&self, id: &str, status: ReservationStatus) -> DomainResult<()> {
        let existing = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            });
        };

        let mut active: reservation::ActiveModel = existing.into();
        active.status = Set(status.as_str().to_string());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_unit_type(&self, unit_type_id: i32) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::UnitTypeId.eq(unit_type_id))
            .order_by_desc(reservation::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_page(&self, page: u64, limit: u64) -> DomainResult<(Vec<Reservation>, u64)> {
        let paginator = reservation::Entity::find()
            .order_by_desc(reservation::Column::CreatedAt)
            .paginate(&self.db, limit.max(1));

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.max(1) - 1)
            .await
            .map_err(db_err)?;
        let reservations = models
            .into_iter()
            .map(model_to_domain)
            .collect::<DomainResult<Vec<_>>>()?;
        Ok((reservations, total))
    }

    async fn find_stale_pending(
        &self,
        cutoff: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::Status.eq(ReservationStatus::Pending.as_str()))
            .filter(reservation::Column::CreatedAt.lt(cutoff))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }
}
