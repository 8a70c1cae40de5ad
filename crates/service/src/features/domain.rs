use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Submission input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeature {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Persisted feature, without its derived vote count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<models::feature::Model> for FeatureRecord {
    fn from(m: models::feature::Model) -> Self {
        Self { id: m.id, title: m.title, description: m.description, created_at: m.created_at.with_timezone(&Utc) }
    }
}

/// Feature as returned to callers. `votes` is computed at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureView {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub votes: u64,
}

impl FeatureView {
    pub fn from_record(r: FeatureRecord, votes: u64) -> Self {
        Self { id: r.id, title: r.title, description: r.description, created_at: r.created_at, votes }
    }
}

/// Feature ids arrive as opaque strings from the path. Anything that is not a
/// UUID cannot name a stored feature.
pub fn parse_feature_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
