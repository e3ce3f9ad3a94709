//! Migrator registering the choice tables read by the image job forms.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_image_type;
mod m20240101_000002_create_arch;
mod m20240101_000003_create_build_service;
mod m20240101_000004_create_token;
mod m20240101_000009_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_image_type::Migration),
            Box::new(m20240101_000002_create_arch::Migration),
            Box::new(m20240101_000003_create_build_service::Migration),
            Box::new(m20240101_000004_create_token::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000009_add_indexes::Migration),
        ]
    }
}
