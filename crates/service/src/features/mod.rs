//! Feature Store: submit features and list them with live vote tallies.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::FeatureStore;
