use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Service: listing order (created_at desc, id desc)
        manager
            .create_index(
                Index::create()
                    .name("idx_service_created_id")
                    .table(Service::Table)
                    .col(Service::CreatedAt)
                    .col(Service::Id)
                    .to_owned(),
            )
            .await?;

        // Service: owner and location lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_service_user")
                    .table(Service::Table)
                    .col(Service::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_service_location")
                    .table(Service::Table)
                    .col(Service::LocationId)
                    .to_owned(),
            )
            .await?;

        // Join table: reverse direction of the composite primary key
        manager
            .create_index(
                Index::create()
                    .name("idx_service_category_category")
                    .table(ServiceCategory::Table)
                    .col(ServiceCategory::CategoryId)
                    .to_owned(),
            )
            .await?;

        // Review: per-service aggregation
        manager
            .create_index(
                Index::create()
                    .name("idx_review_service")
                    .table(Review::Table)
                    .col(Review::ServiceId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_service_created_id").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_user").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_location").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_category_category").table(ServiceCategory::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_review_service").table(Review::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Service { Table, Id, UserId, LocationId, CreatedAt }

#[derive(DeriveIden)]
enum ServiceCategory { Table, CategoryId }

#[derive(DeriveIden)]
enum Review { Table, ServiceId }
