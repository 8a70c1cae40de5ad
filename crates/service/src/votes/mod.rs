//! Vote Ledger: one vote per user per feature, and per-feature tallies.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::VoteLedger;
