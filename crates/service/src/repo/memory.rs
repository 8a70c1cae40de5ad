use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::features::domain::FeatureRecord;
use crate::features::repository::FeatureRepository;
use crate::votes::domain::VoteRecord;
use crate::votes::repository::VoteRepository;

#[derive(Default)]
struct MemoryState {
    // insertion order
    features: Vec<FeatureRecord>,
    votes: Vec<VoteRecord>,
    pairs: HashSet<(Uuid, String)>,
}

/// In-process backend shared by the feature and vote repositories.
///
/// The uniqueness check and the vote insert happen under one lock, so the
/// one-vote-per-user rule holds under concurrency just like the unique index
/// does in Postgres.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
    offline: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Arc<Self> { Arc::new(Self::default()) }

    /// Simulate an unreachable store: every call fails with `StoreUnavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, ServiceError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ServiceError::StoreUnavailable("memory store offline".into()));
        }
        self.state.lock().map_err(|e| ServiceError::Internal(format!("memory store poisoned: {e}")))
    }

    /// Raw vote rows for a feature.
    pub fn votes_for(&self, feature_id: Uuid) -> Result<Vec<VoteRecord>, ServiceError> {
        let state = self.lock()?;
        Ok(state.votes.iter().filter(|v| v.feature_id == feature_id).cloned().collect())
    }

    pub fn vote_rows(&self) -> Result<usize, ServiceError> {
        Ok(self.lock()?.votes.len())
    }
}

pub struct InMemoryFeatureRepository {
    backend: Arc<MemoryBackend>,
}

impl InMemoryFeatureRepository {
    pub fn new(backend: Arc<MemoryBackend>) -> Self { Self { backend } }
}

#[async_trait]
impl FeatureRepository for InMemoryFeatureRepository {
    async fn insert(&self, title: &str, description: Option<&str>) -> Result<FeatureRecord, ServiceError> {
        let mut state = self.backend.lock()?;
        let record = FeatureRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.map(str::to_string),
            created_at: Utc::now(),
        };
        state.features.push(record.clone());
        Ok(record)
    }

    async fn find(&self, id: Uuid) -> Result<Option<FeatureRecord>, ServiceError> {
        let state = self.backend.lock()?;
        Ok(state.features.iter().find(|f| f.id == id).cloned())
    }

    async fn list_recent_first(&self) -> Result<Vec<FeatureRecord>, ServiceError> {
        let state = self.backend.lock()?;
        // Newest insert first, then a stable sort keeps that order for equal timestamps.
        let mut out: Vec<FeatureRecord> = state.features.iter().rev().cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }
}

pub struct InMemoryVoteRepository {
    backend: Arc<MemoryBackend>,
}

impl InMemoryVoteRepository {
    pub fn new(backend: Arc<MemoryBackend>) -> Self { Self { backend } }
}

#[async_trait]
impl VoteRepository for InMemoryVoteRepository {
    async fn insert_unique(&self, feature_id: Uuid, user_identifier: &str) -> Result<bool, ServiceError> {
        let mut state = self.backend.lock()?;
        if !state.pairs.insert((feature_id, user_identifier.to_string())) {
            return Ok(false);
        }
        state.votes.push(VoteRecord { feature_id, user_identifier: user_identifier.to_string(), voted_at: Utc::now() });
        Ok(true)
    }

    async fn count_for(&self, feature_id: Uuid) -> Result<u64, ServiceError> {
        let state = self.backend.lock()?;
        Ok(state.votes.iter().filter(|v| v.feature_id == feature_id).count() as u64)
    }

    async fn tally(&self) -> Result<HashMap<Uuid, u64>, ServiceError> {
        let state = self.backend.lock()?;
        let mut counts = HashMap::new();
        for v in &state.votes {
            *counts.entry(v.feature_id).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_unique_rejects_same_pair() {
        let backend = MemoryBackend::new();
        let votes = InMemoryVoteRepository::new(backend.clone());
        let f = Uuid::new_v4();
        assert!(votes.insert_unique(f, "u1").await.unwrap());
        assert!(!votes.insert_unique(f, "u1").await.unwrap());
        assert!(votes.insert_unique(f, "u2").await.unwrap());
        assert!(votes.insert_unique(Uuid::new_v4(), "u1").await.unwrap());
        assert_eq!(votes.count_for(f).await.unwrap(), 2);
        assert_eq!(backend.vote_rows().unwrap(), 3);
        assert_eq!(backend.votes_for(f).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn tally_counts_every_voted_feature() {
        let backend = MemoryBackend::new();
        let votes = InMemoryVoteRepository::new(backend);
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        votes.insert_unique(a, "u1").await.unwrap();
        votes.insert_unique(a, "u2").await.unwrap();
        votes.insert_unique(c, "u1").await.unwrap();
        let t = votes.tally().await.unwrap();
        assert_eq!(t.get(&a), Some(&2));
        assert_eq!(t.get(&b), None);
        assert_eq!(t.get(&c), Some(&1));
    }

    #[tokio::test]
    async fn list_is_newest_first_even_with_equal_timestamps() {
        let backend = MemoryBackend::new();
        let features = InMemoryFeatureRepository::new(backend);
        let first = features.insert("first", None).await.unwrap();
        let second = features.insert("second", None).await.unwrap();
        let third = features.insert("third", None).await.unwrap();
        let ids: Vec<Uuid> = features.list_recent_first().await.unwrap().into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[tokio::test]
    async fn offline_backend_reports_store_unavailable() {
        let backend = MemoryBackend::new();
        let features = InMemoryFeatureRepository::new(backend.clone());
        backend.set_offline(true);
        assert!(matches!(features.insert("x", None).await, Err(ServiceError::StoreUnavailable(_))));
        backend.set_offline(false);
        assert!(features.insert("x", None).await.is_ok());
    }
}
