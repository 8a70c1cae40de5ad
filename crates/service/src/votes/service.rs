use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::domain::VoteReceipt;
use super::repository::VoteRepository;
use crate::errors::ServiceError;
use crate::features::domain::parse_feature_id;
use crate::features::repository::FeatureRepository;

/// Enforces one vote per user per feature and reports tallies.
pub struct VoteLedger<F: FeatureRepository + ?Sized, V: VoteRepository + ?Sized> {
    features: Arc<F>,
    votes: Arc<V>,
}

impl<F: FeatureRepository + ?Sized, V: VoteRepository + ?Sized> VoteLedger<F, V> {
    pub fn new(features: Arc<F>, votes: Arc<V>) -> Self { Self { features, votes } }

    /// Cast a vote.
    ///
    /// Outcomes, checked in order:
    /// - `NotFound` when no feature has this id (nothing written)
    /// - `Conflict` when this user already voted for it (nothing written)
    /// - a receipt otherwise
    ///
    /// `user_identifier` is an opaque token and is used as given. The
    /// duplicate check is the repository's atomic conditional insert, so two
    /// concurrent requests for the same pair cannot both succeed. Once the
    /// insert lands the vote counts as registered; the tally on the receipt
    /// is read afterwards and left empty if that read fails.
    #[instrument(skip_all, fields(feature_id = %feature_id))]
    pub async fn cast_vote(&self, feature_id: &str, user_identifier: &str) -> Result<VoteReceipt, ServiceError> {
        let Some(id) = parse_feature_id(feature_id) else {
            warn!("vote_on_unknown_feature");
            return Err(ServiceError::feature_not_found());
        };
        if self.features.find(id).await?.is_none() {
            warn!("vote_on_unknown_feature");
            return Err(ServiceError::feature_not_found());
        }

        if !self.votes.insert_unique(id, user_identifier).await? {
            debug!(%user_identifier, "duplicate_vote");
            info!("already_voted");
            return Err(ServiceError::already_voted());
        }

        let votes = match self.votes.count_for(id).await {
            Ok(n) => Some(n),
            Err(e) => {
                warn!(error = %e, "vote_tally_unavailable");
                None
            }
        };
        info!(?votes, "vote_registered");
        Ok(VoteReceipt::registered(id, votes))
    }

    /// Exact number of votes recorded for a feature; 0 for unknown ids.
    pub async fn count_votes(&self, feature_id: &str) -> Result<u64, ServiceError> {
        match parse_feature_id(feature_id) {
            Some(id) => self.votes.count_for(id).await,
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureStore;
    use crate::repo::memory::{InMemoryFeatureRepository, InMemoryVoteRepository, MemoryBackend};
    use uuid::Uuid;

    type MemLedger = VoteLedger<InMemoryFeatureRepository, InMemoryVoteRepository>;
    type MemStore = FeatureStore<InMemoryFeatureRepository, InMemoryVoteRepository>;

    fn setup() -> (Arc<MemoryBackend>, MemStore, Arc<MemLedger>) {
        let backend = MemoryBackend::new();
        let features = Arc::new(InMemoryFeatureRepository::new(backend.clone()));
        let votes = Arc::new(InMemoryVoteRepository::new(backend.clone()));
        (
            backend,
            FeatureStore::new(features.clone(), votes.clone()),
            Arc::new(VoteLedger::new(features, votes)),
        )
    }

    #[tokio::test]
    async fn dark_mode_scenario() {
        let (_, store, ledger) = setup();
        let a = store.create("Dark mode", None).await.unwrap();
        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].votes, 0);

        let id = a.id.to_string();
        let r = ledger.cast_vote(&id, "user1").await.unwrap();
        assert_eq!(r.status, "success");
        assert_eq!(r.message, "Vote registered.");
        assert_eq!(r.votes, Some(1));

        match ledger.cast_vote(&id, "user1").await {
            Err(ServiceError::Conflict(m)) => assert_eq!(m, "Already voted."),
            other => panic!("expected conflict, got {:?}", other),
        }

        assert_eq!(ledger.cast_vote(&id, "user2").await.unwrap().votes, Some(2));
        assert_eq!(store.list().await.unwrap()[0].votes, 2);

        match ledger.cast_vote("nonexistent-id", "user3").await {
            Err(ServiceError::NotFound(m)) => assert_eq!(m, "Feature not found."),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_feature_writes_nothing() {
        let (backend, _, ledger) = setup();
        for user in ["a", "b", "c"] {
            let missing = Uuid::new_v4().to_string();
            assert!(matches!(ledger.cast_vote(&missing, user).await, Err(ServiceError::NotFound(_))));
        }
        assert_eq!(backend.vote_rows().unwrap(), 0);
    }

    #[tokio::test]
    async fn duplicates_do_not_change_count() {
        let (backend, store, ledger) = setup();
        let a = store.create("A", None).await.unwrap();
        let id = a.id.to_string();
        ledger.cast_vote(&id, "u1").await.unwrap();
        for _ in 0..5 {
            assert!(ledger.cast_vote(&id, "u1").await.is_err());
        }
        assert_eq!(ledger.count_votes(&id).await.unwrap(), 1);
        assert_eq!(backend.votes_for(a.id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_feature_is_not_found_whatever_the_identifier() {
        let (backend, _, ledger) = setup();
        let long = "u".repeat(300);
        for user in ["", "  ", long.as_str()] {
            assert!(matches!(ledger.cast_vote("nonexistent-id", user).await, Err(ServiceError::NotFound(_))));
            let missing = Uuid::new_v4().to_string();
            assert!(matches!(ledger.cast_vote(&missing, user).await, Err(ServiceError::NotFound(_))));
        }
        assert_eq!(backend.vote_rows().unwrap(), 0);
    }

    #[tokio::test]
    async fn identifiers_are_opaque_tokens() {
        let (backend, store, ledger) = setup();
        let a = store.create("A", None).await.unwrap();
        let id = a.id.to_string();
        let long = "x".repeat(256);
        assert_eq!(ledger.cast_vote(&id, &long).await.unwrap().votes, Some(1));
        assert!(matches!(ledger.cast_vote(&id, &long).await, Err(ServiceError::Conflict(_))));
        // surrounding whitespace makes a different token
        assert!(ledger.cast_vote(&id, " user1").await.is_ok());
        assert!(ledger.cast_vote(&id, "user1").await.is_ok());
        let stored: Vec<String> = backend.votes_for(a.id).unwrap().into_iter().map(|v| v.user_identifier).collect();
        assert_eq!(stored, vec![long, " user1".to_string(), "user1".to_string()]);
    }

    /// Vote repository whose count reads always fail.
    struct CountFails(Arc<InMemoryVoteRepository>);

    #[async_trait::async_trait]
    impl VoteRepository for CountFails {
        async fn insert_unique(&self, feature_id: Uuid, user_identifier: &str) -> Result<bool, ServiceError> {
            self.0.insert_unique(feature_id, user_identifier).await
        }
        async fn count_for(&self, _feature_id: Uuid) -> Result<u64, ServiceError> {
            Err(ServiceError::StoreUnavailable("blip".into()))
        }
        async fn tally(&self) -> Result<std::collections::HashMap<Uuid, u64>, ServiceError> {
            self.0.tally().await
        }
    }

    #[tokio::test]
    async fn stored_vote_succeeds_when_tally_read_fails() {
        let backend = MemoryBackend::new();
        let features = Arc::new(InMemoryFeatureRepository::new(backend.clone()));
        let votes = Arc::new(CountFails(Arc::new(InMemoryVoteRepository::new(backend.clone()))));
        let store = FeatureStore::new(features.clone(), votes.clone());
        let ledger = VoteLedger::new(features, votes);

        let a = store.create("A", None).await.unwrap();
        let id = a.id.to_string();
        let receipt = ledger.cast_vote(&id, "user1").await.unwrap();
        assert_eq!(receipt.status, "success");
        assert_eq!(receipt.votes, None);
        assert_eq!(backend.vote_rows().unwrap(), 1);
        assert!(matches!(ledger.cast_vote(&id, "user1").await, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn count_votes_for_garbage_id_is_zero() {
        let (_, _, ledger) = setup();
        assert_eq!(ledger.count_votes("nope").await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_duplicate_votes_succeed_once() {
        let (backend, store, ledger) = setup();
        let a = store.create("Race", None).await.unwrap();
        let id = a.id.to_string();

        let mut handles = vec![];
        for _ in 0..32 {
            let ledger = ledger.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move { ledger.cast_vote(&id, "same-user").await }));
        }
        let mut ok = 0;
        let mut conflicts = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => ok += 1,
                Err(ServiceError::Conflict(_)) => conflicts += 1,
                Err(e) => panic!("unexpected error {e}"),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(conflicts, 31);
        assert_eq!(backend.vote_rows().unwrap(), 1);
    }

    #[tokio::test]
    async fn offline_store_fails_before_any_outcome() {
        let (backend, store, ledger) = setup();
        let a = store.create("A", None).await.unwrap();
        backend.set_offline(true);
        assert!(matches!(
            ledger.cast_vote(&a.id.to_string(), "u1").await,
            Err(ServiceError::StoreUnavailable(_))
        ));
        backend.set_offline(false);
        assert_eq!(backend.vote_rows().unwrap(), 0);
    }
}
