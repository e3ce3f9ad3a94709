//! Create `arch` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Arch::Table)
                    .if_not_exists()
                    .col(uuid(Arch::Id).primary_key())
                    .col(string_len(Arch::Name, 64).unique_key().not_null())
                    .col(timestamp_with_time_zone(Arch::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Arch::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Arch { Table, Id, Name, CreatedAt }
