use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vote::Table)
                    .if_not_exists()
                    .col(uuid(Vote::Id).primary_key())
                    .col(uuid(Vote::FeatureId).not_null())
                    .col(text(Vote::UserIdentifier).not_null())
                    .col(timestamp_with_time_zone(Vote::VotedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_feature")
                            .from(Vote::Table, Vote::FeatureId)
                            .to(Feature::Table, Feature::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Vote::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Vote { Table, Id, FeatureId, UserIdentifier, VotedAt }

#[derive(DeriveIden)]
enum Feature { Table, Id }
