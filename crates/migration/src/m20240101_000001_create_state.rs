//! Create `state` reference table.
//! `code` is the short identifier used by the search state filter.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(State::Table)
                    .if_not_exists()
                    .col(pk_auto(State::Id))
                    .col(string_len(State::Name, 64).not_null())
                    .col(string_len(State::Code, 8).unique_key().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(State::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum State { Table, Id, Name, Code }
