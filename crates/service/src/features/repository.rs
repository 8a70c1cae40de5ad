use async_trait::async_trait;
use uuid::Uuid;

use super::domain::FeatureRecord;
use crate::errors::ServiceError;

/// Persistence for feature records.
#[async_trait]
pub trait FeatureRepository: Send + Sync {
    /// Store a new feature. Id and `created_at` are assigned by the repository.
    async fn insert(&self, title: &str, description: Option<&str>) -> Result<FeatureRecord, ServiceError>;
    async fn find(&self, id: Uuid) -> Result<Option<FeatureRecord>, ServiceError>;
    /// Every feature ordered by `created_at`, newest first.
    async fn list_recent_first(&self) -> Result<Vec<FeatureRecord>, ServiceError>;
}
