use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Persistence for votes.
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Record a vote unless `(feature_id, user_identifier)` already has one.
    /// Must be atomic: of any number of concurrent calls for the same pair,
    /// exactly one returns `true`.
    async fn insert_unique(&self, feature_id: Uuid, user_identifier: &str) -> Result<bool, ServiceError>;
    async fn count_for(&self, feature_id: Uuid) -> Result<u64, ServiceError>;
    /// Counts for every feature that has votes, in one read.
    async fn tally(&self) -> Result<HashMap<Uuid, u64>, ServiceError>;
}
