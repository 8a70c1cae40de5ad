//! Repository implementations.

pub mod memory;
pub mod seaorm;

pub use memory::{InMemoryFeatureRepository, InMemoryVoteRepository, MemoryBackend};
pub use seaorm::{SeaOrmFeatureRepository, SeaOrmVoteRepository};
