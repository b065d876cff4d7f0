//! SeaORM implementation of UnitTypeCatalog

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{DomainError, DomainResult, NewUnitType, UnitKind, UnitType, UnitTypeCatalog};
use crate::infrastructure::database::entities::unit_type;

pub struct SeaOrmUnitTypeCatalog {
    db: DatabaseConnection,
}

impl SeaOrmUnitTypeCatalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: unit_type::Model) -> UnitType {
    let kind = match m.kind.as_str() {
        "MeetingRoom" => UnitKind::MeetingRoom {
            hourly_rate_cents: m.hourly_rate_cents.unwrap_or(0),
        },
        _ => UnitKind::RoomType {
            inventory_count: m.inventory_count.max(0) as u32,
        },
    };
    UnitType {
        id: m.id,
        name: m.name,
        capacity: m.capacity.max(0) as u32,
        kind,
        is_active: m.is_active,
        created_at: m.created_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

// ── UnitTypeCatalog impl ────────────────────────────────────────

#[async_trait]
impl UnitTypeCatalog for SeaOrmUnitTypeCatalog {
    async fn insert(&self, new: NewUnitType) -> DomainResult<UnitType> {
        debug!("Creating unit type: {}", new.name);

        let (inventory_count, hourly_rate_cents) = match new.kind {
            UnitKind::RoomType { inventory_count } => (inventory_count as i32, None),
            UnitKind::MeetingRoom { hourly_rate_cents } => (1, Some(hourly_rate_cents)),
        };

        let model = unit_type::ActiveModel {
            name: Set(new.name),
            capacity: Set(new.capacity as i32),
            kind: Set(new.kind.as_str().to_string()),
            inventory_count: Set(inventory_count),
            hourly_rate_cents: Set(hourly_rate_cents),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<UnitType>> {
        let model = unit_type::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_active(&self) -> DomainResult<Vec<UnitType>> {
        let models = unit_type::Entity::find()
            .filter(unit_type::Column::IsActive.eq(true))
            .order_by_asc(unit_type::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_page(&self, page: u64, limit: u64) -> DomainResult<(Vec<UnitType>, u64)> {
        let paginator = unit_type::Entity::find()
            .order_by_asc(unit_type::Column::Id)
            .paginate(&self.db, limit.max(1));

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.max(1) - 1)
            .await
            .map_err(db_err)?;
        Ok((models.into_iter().map(model_to_domain).collect(), total))
    }

    async fn deactivate(&self, id: i32) -> DomainResult<()> {
        let existing = unit_type::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "UnitType",
                field: "id",
                value: id.to_string(),
            });
        };

        let mut active: unit_type::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }
}
