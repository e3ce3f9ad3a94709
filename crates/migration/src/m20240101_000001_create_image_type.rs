//! Create `image_type` table.
//!
//! Output formats offered by the job form (`raw`, `livecd`, `fs`, ...).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ImageType::Table)
                    .if_not_exists()
                    .col(uuid(ImageType::Id).primary_key())
                    .col(string_len(ImageType::Name, 64).unique_key().not_null())
                    .col(timestamp_with_time_zone(ImageType::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ImageType::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ImageType { Table, Id, Name, CreatedAt }
