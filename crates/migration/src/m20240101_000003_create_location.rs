//! Create `location` table with FK to `state`.
//!
//! Coordinates are stored as decimal strings as given. The sine and cosine of
//! both coordinates are stored next to them so radius searches reduce to
//! arithmetic the store can evaluate without math extensions.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Location::Table)
                    .if_not_exists()
                    .col(pk_auto(Location::Id))
                    .col(string_len(Location::StreetAddress, 255).not_null())
                    .col(string_len(Location::City, 128).not_null())
                    .col(string_len_null(Location::County, 128))
                    .col(string_len(Location::Zip, 16).not_null())
                    .col(integer(Location::StateId).not_null())
                    .col(string_len(Location::Latitude, 32).not_null())
                    .col(string_len(Location::Longitude, 32).not_null())
                    .col(double(Location::LatSin).not_null())
                    .col(double(Location::LatCos).not_null())
                    .col(double(Location::LngSin).not_null())
                    .col(double(Location::LngCos).not_null())
                    .col(timestamp_with_time_zone(Location::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_location_state")
                            .from(Location::Table, Location::StateId)
                            .to(State::Table, State::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Location::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Location { Table, Id, StreetAddress, City, County, Zip, StateId, Latitude, Longitude, LatSin, LatCos, LngSin, LngCos, CreatedAt }

#[derive(DeriveIden)]
enum State { Table, Id }
