//! Service layer: the Feature Store and the Vote Ledger.
//! - Business rules live here; persistence sits behind repository traits.
//! - `repo::seaorm` talks to Postgres through the injected `Store` handle.
//! - `repo::memory` is an in-process backend with the same uniqueness guarantees.

pub mod errors;
pub mod store;
pub mod features;
pub mod votes;
pub mod repo;
#[cfg(test)]
pub mod test_support;

pub use features::FeatureStore;
pub use store::Store;
pub use votes::VoteLedger;
