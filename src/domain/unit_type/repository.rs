//! Unit type catalog interface

use async_trait::async_trait;

use super::model::{NewUnitType, UnitType};
use crate::domain::DomainResult;

/// Read-mostly catalog of bookable unit types.
///
/// Capacity and kind payload are immutable after creation, so the engine
/// may read them without any coordination with admissions.
#[async_trait]
pub trait UnitTypeCatalog: Send + Sync {
    /// Create a unit type; the catalog assigns the ID
    async fn insert(&self, unit_type: NewUnitType) -> DomainResult<UnitType>;

    /// Find unit type by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<UnitType>>;

    /// All active unit types, ordered by ID
    async fn find_active(&self) -> DomainResult<Vec<UnitType>>;

    /// One page of unit types (active and inactive) plus the total count
    async fn find_page(&self, page: u64, limit: u64) -> DomainResult<(Vec<UnitType>, u64)>;

    /// Soft-delete: stop offering the unit type. Existing reservations
    /// are untouched.
    async fn deactivate(&self, id: i32) -> DomainResult<()>;
}
