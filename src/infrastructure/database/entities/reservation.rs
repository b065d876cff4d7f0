//! Reservation entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub unit_type_id: i32,

    /// Booking window, half-open: [window_start, window_end)
    pub window_start: DateTimeUtc,
    pub window_end: DateTimeUtc,

    pub party_size: i32,

    /// Reservation status: Pending, Confirmed, Cancelled
    pub status: String,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::unit_type::Entity",
        from = "Column::UnitTypeId",
        to = "super::unit_type::Column::Id"
    )]
    UnitType,
}

impl Related<super::unit_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UnitType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
