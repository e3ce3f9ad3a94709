//! Create `build_service` table.
//!
//! OBS instances packages may be pulled from; `apiurl` is what the
//! extra repository form submits.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BuildService::Table)
                    .if_not_exists()
                    .col(uuid(BuildService::Id).primary_key())
                    .col(string_len(BuildService::Name, 128).not_null())
                    .col(string_len(BuildService::Apiurl, 512).unique_key().not_null())
                    .col(timestamp_with_time_zone(BuildService::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(BuildService::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum BuildService { Table, Id, Name, Apiurl, CreatedAt }
