//! Migrator registering entity-specific migrations in dependency order.
//! Indexes and reference data are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_state;
mod m20240101_000002_create_user;
mod m20240101_000003_create_location;
mod m20240101_000004_create_category;
mod m20240101_000005_create_service;
mod m20240101_000006_create_service_category;
mod m20240101_000007_create_review;
mod m20240101_000008_add_indexes;
mod m20240101_000009_seed_states;

pub use m20240101_000009_seed_states::STATES;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_state::Migration),
            Box::new(m20240101_000002_create_user::Migration),
            Box::new(m20240101_000003_create_location::Migration),
            Box::new(m20240101_000004_create_category::Migration),
            Box::new(m20240101_000005_create_service::Migration),
            Box::new(m20240101_000006_create_service_category::Migration),
            Box::new(m20240101_000007_create_review::Migration),
            // Indexes should always be applied after the tables they cover
            Box::new(m20240101_000008_add_indexes::Migration),
            Box::new(m20240101_000009_seed_states::Migration),
        ]
    }
}
