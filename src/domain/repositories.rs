//! Repository provider

use crate::domain::reservation::ReservationStore;
use crate::domain::unit_type::UnitTypeCatalog;

/// Unified access to the per-aggregate stores.
///
/// The availability engine and the HTTP layer depend on this trait only;
/// production wires the SeaORM provider, tests the in-memory one.
pub trait RepositoryProvider: Send + Sync {
    fn unit_types(&self) -> &dyn UnitTypeCatalog;
    fn reservations(&self) -> &dyn ReservationStore;
}
