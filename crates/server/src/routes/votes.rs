use axum::{extract::{Path, State}, Json};
use service::errors::ServiceError;
use service::votes::domain::{VoteInput, VoteReceipt};

use crate::{errors::{ApiJson, JsonApiError}, observability::{VOTES_CAST_TOTAL, VOTES_REJECTED_TOTAL}, state::AppState};

#[utoipa::path(
    post, path = "/features/{feature_id}/vote", tag = "votes",
    params(("feature_id" = String, Path, description = "Feature ID")),
    request_body = crate::openapi::VoteCreateDoc,
    responses(
        (status = 200, description = "Vote registered", body = crate::openapi::VoteReceiptDoc),
        (status = 404, description = "Feature not found"),
        (status = 409, description = "Already voted"),
        (status = 422, description = "Validation Error"),
        (status = 503, description = "Database Unavailable"),
        (status = 500, description = "Internal Error")
    )
)]
pub async fn cast(
    State(state): State<AppState>,
    Path(feature_id): Path<String>,
    ApiJson(input): ApiJson<VoteInput>,
) -> Result<Json<VoteReceipt>, JsonApiError> {
    match state.votes.cast_vote(&feature_id, &input.user_identifier).await {
        Ok(receipt) => {
            VOTES_CAST_TOTAL.inc();
            Ok(Json(receipt))
        }
        Err(e) => {
            let reason = match &e {
                ServiceError::NotFound(_) => Some("not_found"),
                ServiceError::Conflict(_) => Some("duplicate"),
                _ => None,
            };
            if let Some(reason) = reason {
                VOTES_REJECTED_TOTAL.with_label_values(&[reason]).inc();
            }
            Err(e.into())
        }
    }
}
