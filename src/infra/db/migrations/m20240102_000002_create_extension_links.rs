//! Migration: Create position/personnel extension link tables.
//!
//! Both joins cascade on either side so removing an extension, a position
//! or a person never leaves dangling links.

use sea_orm_migration::prelude::*;

use super::m20240102_000001_create_directory_tables::{Extensions, Personnel, Positions};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PositionExtensions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PositionExtensions::PositionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PositionExtensions::ExtensionId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(PositionExtensions::PositionId)
                            .col(PositionExtensions::ExtensionId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_position_extensions_position")
                            .from(PositionExtensions::Table, PositionExtensions::PositionId)
                            .to(Positions::Table, Positions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_position_extensions_extension")
                            .from(PositionExtensions::Table, PositionExtensions::ExtensionId)
                            .to(Extensions::Table, Extensions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PersonnelExtensions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PersonnelExtensions::PersonnelId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PersonnelExtensions::ExtensionId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(PersonnelExtensions::PersonnelId)
                            .col(PersonnelExtensions::ExtensionId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_personnel_extensions_personnel")
                            .from(PersonnelExtensions::Table, PersonnelExtensions::PersonnelId)
                            .to(Personnel::Table, Personnel::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_personnel_extensions_extension")
                            .from(PersonnelExtensions::Table, PersonnelExtensions::ExtensionId)
                            .to(Extensions::Table, Extensions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PersonnelExtensions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PositionExtensions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PositionExtensions {
    Table,
    PositionId,
    ExtensionId,
}

#[derive(Iden)]
enum PersonnelExtensions {
    Table,
    PersonnelId,
    ExtensionId,
}
