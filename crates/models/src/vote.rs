use std::collections::HashMap;

use sea_orm::{
    entity::prelude::*, sea_query::OnConflict, DatabaseConnection, FromQueryResult, PaginatorTrait, QuerySelect, Set, SqlErr,
};
use sea_orm::sea_query::Expr;
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::feature;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vote")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub feature_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub user_identifier: String,
    pub voted_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Feature }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Feature => Entity::belongs_to(feature::Entity).from(Column::FeatureId).to(feature::Column::Id).into() }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert a vote unless one already exists for `(feature_id, user_identifier)`.
///
/// The check and the write are a single `INSERT ... ON CONFLICT DO NOTHING`
/// against `uniq_vote_feature_user`, so concurrent duplicates cannot both land.
/// `user_identifier` is an opaque token and is stored byte for byte.
/// Returns `false` when the pair was already present.
pub async fn insert_unique(db: &DatabaseConnection, feature_id: Uuid, user_identifier: &str) -> Result<bool, errors::ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        feature_id: Set(feature_id),
        user_identifier: Set(user_identifier.to_string()),
        voted_at: Set(Utc::now().into()),
    };
    let res = Entity::insert(am)
        .on_conflict(
            OnConflict::columns([Column::FeatureId, Column::UserIdentifier])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;
    match res {
        Ok(rows) => Ok(rows > 0),
        Err(DbErr::RecordNotInserted) => Ok(false),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

pub async fn count_for_feature(db: &DatabaseConnection, feature_id: Uuid) -> Result<u64, errors::ModelError> {
    Ok(Entity::find()
        .filter(Column::FeatureId.eq(feature_id))
        .count(db)
        .await?)
}

#[derive(Debug, FromQueryResult)]
struct FeatureTally {
    feature_id: Uuid,
    votes: i64,
}

/// Vote counts for every feature in one grouped query, with no bind
/// parameters. Features without votes are absent from the map.
pub async fn tally(db: &DatabaseConnection) -> Result<HashMap<Uuid, u64>, errors::ModelError> {
    let rows = Entity::find()
        .select_only()
        .column(Column::FeatureId)
        .column_as(Expr::col(Column::Id).count(), "votes")
        .group_by(Column::FeatureId)
        .into_model::<FeatureTally>()
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|r| (r.feature_id, u64::try_from(r.votes).unwrap_or(0)))
        .collect())
}
