//! Create `feature` table.
//!
//! Vote counts are never stored here; they are derived from `vote` rows.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Feature::Table)
                    .if_not_exists()
                    .col(uuid(Feature::Id).primary_key())
                    .col(text(Feature::Title).not_null())
                    .col(text_null(Feature::Description))
                    .col(timestamp_with_time_zone(Feature::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Feature::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Feature { Table, Id, Title, Description, CreatedAt }
