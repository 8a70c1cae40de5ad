use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Feature: listing is newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_feature_created_at")
                    .table(Feature::Table)
                    .col(Feature::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Vote: tallies group by feature_id
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_feature")
                    .table(Vote::Table)
                    .col(Vote::FeatureId)
                    .to_owned(),
            )
            .await?;

        // Vote: one vote per user per feature; inserts target this with ON CONFLICT
        manager
            .create_index(
                Index::create()
                    .name("uniq_vote_feature_user")
                    .table(Vote::Table)
                    .col(Vote::FeatureId)
                    .col(Vote::UserIdentifier)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_feature_created_at").table(Feature::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_vote_feature").table(Vote::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_vote_feature_user").table(Vote::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Feature { Table, CreatedAt }

#[derive(DeriveIden)]
enum Vote { Table, FeatureId, UserIdentifier }
