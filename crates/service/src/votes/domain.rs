use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Vote request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteInput {
    /// Opaque per-user/device token, trusted as given.
    pub user_identifier: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub feature_id: Uuid,
    pub user_identifier: String,
    pub voted_at: DateTime<Utc>,
}

/// Result of a successful vote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub status: String,
    pub message: String,
    pub feature_id: Uuid,
    /// Tally for the feature right after this vote landed. `None` when the
    /// vote was stored but the follow-up count could not be read.
    pub votes: Option<u64>,
}

impl VoteReceipt {
    pub fn registered(feature_id: Uuid, votes: Option<u64>) -> Self {
        Self { status: "success".into(), message: "Vote registered.".into(), feature_id, votes }
    }
}
