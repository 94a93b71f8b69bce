//! Migration: Create departments, extensions, positions and personnel.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Departments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Departments::Name)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // A department removal turns its extensions into global ones
        manager
            .create_table(
                Table::create()
                    .table(Extensions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Extensions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Extensions::Number)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Extensions::DepartmentId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_extensions_department")
                            .from(Extensions::Table, Extensions::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Positions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Positions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Positions::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Positions::DepartmentId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_positions_department")
                            .from(Positions::Table, Positions::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_positions_name_department")
                    .table(Positions::Table)
                    .col(Positions::Name)
                    .col(Positions::DepartmentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Personnel::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Personnel::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Personnel::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Personnel::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Personnel::Description).text().null())
                    .col(ColumnDef::new(Personnel::PhotoUrl).string_len(255).null())
                    .col(
                        ColumnDef::new(Personnel::InCarousel)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Personnel::BirthDate).date().null())
                    .col(ColumnDef::new(Personnel::PositionId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_personnel_position")
                            .from(Personnel::Table, Personnel::PositionId)
                            .to(Positions::Table, Positions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Natural key for bulk import upserts
        manager
            .create_index(
                Index::create()
                    .name("idx_personnel_name")
                    .table(Personnel::Table)
                    .col(Personnel::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Personnel::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Positions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Extensions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Departments {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
pub(super) enum Extensions {
    Table,
    Id,
    Number,
    DepartmentId,
}

#[derive(Iden)]
pub(super) enum Positions {
    Table,
    Id,
    Name,
    DepartmentId,
}

#[derive(Iden)]
pub(super) enum Personnel {
    Table,
    Id,
    Name,
    Email,
    Description,
    PhotoUrl,
    InCarousel,
    BirthDate,
    PositionId,
}
