use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct FeatureCreateDoc {
    pub title: String,
    pub description: Option<String>,
}

#[derive(ToSchema)]
pub struct FeatureDoc {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub votes: u64,
}

#[derive(ToSchema)]
pub struct VoteCreateDoc {
    /// Per-user/device token; one vote per token per feature.
    pub user_identifier: String,
}

#[derive(ToSchema)]
pub struct VoteReceiptDoc {
    pub status: String,
    pub message: String,
    pub feature_id: Uuid,
    /// Tally right after the vote; null if it could not be read.
    pub votes: Option<u64>,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Feature Voting API",
        description = "An API for submitting and voting on new product features."
    ),
    paths(
        crate::routes::health,
        crate::routes::features::create,
        crate::routes::features::list,
        crate::routes::features::get,
        crate::routes::votes::cast,
    ),
    components(
        schemas(
            HealthResponse,
            FeatureCreateDoc,
            FeatureDoc,
            VoteCreateDoc,
            VoteReceiptDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "features"),
        (name = "votes")
    )
)]
pub struct ApiDoc;
