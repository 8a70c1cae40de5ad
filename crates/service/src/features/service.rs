use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::{parse_feature_id, FeatureView};
use super::repository::FeatureRepository;
use crate::errors::ServiceError;
use crate::votes::repository::VoteRepository;

/// Application service for feature submission and listing.
/// Vote counts are a read-time projection over the vote repository.
pub struct FeatureStore<F: FeatureRepository + ?Sized, V: VoteRepository + ?Sized> {
    features: Arc<F>,
    votes: Arc<V>,
}

impl<F: FeatureRepository + ?Sized, V: VoteRepository + ?Sized> FeatureStore<F, V> {
    pub fn new(features: Arc<F>, votes: Arc<V>) -> Self { Self { features, votes } }

    /// Submit a feature. The new feature starts with zero votes.
    #[instrument(skip_all, fields(title_len = title.len()))]
    pub async fn create(&self, title: &str, description: Option<&str>) -> Result<FeatureView, ServiceError> {
        models::feature::validate_title(title)?;
        let record = self.features.insert(title, description).await?;
        info!(feature_id = %record.id, "feature_created");
        Ok(FeatureView::from_record(record, 0))
    }

    /// Every feature, newest first, each with its current vote count.
    ///
    /// Counts come from one grouped tally over the vote table rather than a
    /// count query per feature, so the query size does not grow with the
    /// number of features.
    #[instrument(skip_all)]
    pub async fn list(&self) -> Result<Vec<FeatureView>, ServiceError> {
        let records = self.features.list_recent_first().await?;
        let tally = self.votes.tally().await?;
        let out: Vec<FeatureView> = records
            .into_iter()
            .map(|r| {
                let votes = tally.get(&r.id).copied().unwrap_or(0);
                FeatureView::from_record(r, votes)
            })
            .collect();
        info!(count = out.len(), "features_listed");
        Ok(out)
    }

    pub async fn get(&self, feature_id: &str) -> Result<Option<FeatureView>, ServiceError> {
        let Some(id) = parse_feature_id(feature_id) else { return Ok(None) };
        match self.features.find(id).await? {
            Some(r) => {
                let votes = self.votes.count_for(id).await?;
                Ok(Some(FeatureView::from_record(r, votes)))
            }
            None => Ok(None),
        }
    }
}
