use std::sync::Arc;

use service::features::repository::FeatureRepository;
use service::repo::{InMemoryFeatureRepository, InMemoryVoteRepository, MemoryBackend, SeaOrmFeatureRepository, SeaOrmVoteRepository};
use service::votes::repository::VoteRepository;
use service::{FeatureStore, Store, VoteLedger};

pub type SharedFeatureStore = Arc<FeatureStore<dyn FeatureRepository, dyn VoteRepository>>;
pub type SharedVoteLedger = Arc<VoteLedger<dyn FeatureRepository, dyn VoteRepository>>;

/// Handler state: both components over the same repositories.
#[derive(Clone)]
pub struct AppState {
    pub features: SharedFeatureStore,
    pub votes: SharedVoteLedger,
}

impl AppState {
    pub fn from_repositories(features: Arc<dyn FeatureRepository>, votes: Arc<dyn VoteRepository>) -> Self {
        Self {
            features: Arc::new(FeatureStore::new(Arc::clone(&features), Arc::clone(&votes))),
            votes: Arc::new(VoteLedger::new(features, votes)),
        }
    }

    /// Postgres-backed state over the process-wide store handle.
    pub fn seaorm(store: Store) -> Self {
        Self::from_repositories(
            Arc::new(SeaOrmFeatureRepository { store: store.clone() }),
            Arc::new(SeaOrmVoteRepository { store }),
        )
    }

    pub fn in_memory(backend: Arc<MemoryBackend>) -> Self {
        Self::from_repositories(
            Arc::new(InMemoryFeatureRepository::new(Arc::clone(&backend))),
            Arc::new(InMemoryVoteRepository::new(backend)),
        )
    }
}
