//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::ReservationStore;
use crate::domain::unit_type::UnitTypeCatalog;

use super::reservation_repository::SeaOrmReservationStore;
use super::unit_type_repository::SeaOrmUnitTypeCatalog;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate store accessors.
pub struct SeaOrmRepositoryProvider {
    unit_types: SeaOrmUnitTypeCatalog,
    reservations: SeaOrmReservationStore,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            unit_types: SeaOrmUnitTypeCatalog::new(db.clone()),
            reservations: SeaOrmReservationStore::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn unit_types(&self) -> &dyn UnitTypeCatalog {
        &self.unit_types
    }

    fn reservations(&self) -> &dyn ReservationStore {
        &self.reservations
    }
}
