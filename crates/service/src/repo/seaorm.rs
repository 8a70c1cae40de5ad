use std::collections::HashMap;

use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::features::domain::FeatureRecord;
use crate::features::repository::FeatureRepository;
use crate::store::Store;
use crate::votes::repository::VoteRepository;

pub struct SeaOrmFeatureRepository {
    pub store: Store,
}

#[async_trait::async_trait]
impl FeatureRepository for SeaOrmFeatureRepository {
    async fn insert(&self, title: &str, description: Option<&str>) -> Result<FeatureRecord, ServiceError> {
        let created = models::feature::create(self.store.conn()?, title, description).await?;
        Ok(created.into())
    }

    async fn find(&self, id: Uuid) -> Result<Option<FeatureRecord>, ServiceError> {
        let res = models::feature::Entity::find_by_id(id)
            .one(self.store.conn()?)
            .await
            .map_err(ServiceError::from_db)?;
        Ok(res.map(FeatureRecord::from))
    }

    async fn list_recent_first(&self) -> Result<Vec<FeatureRecord>, ServiceError> {
        let rows = models::feature::list_recent_first(self.store.conn()?).await?;
        Ok(rows.into_iter().map(FeatureRecord::from).collect())
    }
}

pub struct SeaOrmVoteRepository {
    pub store: Store,
}

#[async_trait::async_trait]
impl VoteRepository for SeaOrmVoteRepository {
    async fn insert_unique(&self, feature_id: Uuid, user_identifier: &str) -> Result<bool, ServiceError> {
        Ok(models::vote::insert_unique(self.store.conn()?, feature_id, user_identifier).await?)
    }

    async fn count_for(&self, feature_id: Uuid) -> Result<u64, ServiceError> {
        Ok(models::vote::count_for_feature(self.store.conn()?, feature_id).await?)
    }

    async fn tally(&self) -> Result<HashMap<Uuid, u64>, ServiceError> {
        Ok(models::vote::tally(self.store.conn()?).await?)
    }
}
