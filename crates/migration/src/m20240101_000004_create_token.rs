//! Create `token` table.
//!
//! Named substitution tokens for kickstart templates, each with a default
//! value and a description shown as help text.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Token::Table)
                    .if_not_exists()
                    .col(uuid(Token::Id).primary_key())
                    .col(string_len(Token::Name, 128).unique_key().not_null())
                    .col(string_len(Token::DefaultValue, 1024).not_null())
                    .col(string_len(Token::Description, 1024).not_null())
                    .col(timestamp_with_time_zone(Token::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Token::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Token { Table, Id, Name, DefaultValue, Description, CreatedAt }
