//! Create unit_types table
//!
//! The catalog of bookable unit types: hotel room types with an inventory
//! pool, meeting rooms with an hourly hire rate.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UnitTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UnitTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UnitTypes::Name).string().not_null())
                    .col(ColumnDef::new(UnitTypes::Capacity).integer().not_null())
                    .col(ColumnDef::new(UnitTypes::Kind).string().not_null())
                    .col(
                        ColumnDef::new(UnitTypes::InventoryCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(UnitTypes::HourlyRateCents).big_integer())
                    .col(
                        ColumnDef::new(UnitTypes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(UnitTypes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_unit_types_is_active")
                    .table(UnitTypes::Table)
                    .col(UnitTypes::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UnitTypes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum UnitTypes {
    Table,
    Id,
    Name,
    Capacity,
    Kind,
    InventoryCount,
    HourlyRateCents,
    IsActive,
    CreatedAt,
}
