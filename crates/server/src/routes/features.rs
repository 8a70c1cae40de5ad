use axum::{extract::{Path, State}, http::StatusCode, Json};
use service::features::domain::{FeatureView, NewFeature};
use tracing::info;

use crate::{errors::{ApiJson, JsonApiError}, observability::FEATURES_CREATED_TOTAL, state::AppState};

#[utoipa::path(
    post, path = "/features", tag = "features",
    request_body = crate::openapi::FeatureCreateDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::FeatureDoc),
        (status = 422, description = "Validation Error"),
        (status = 503, description = "Database Unavailable"),
        (status = 500, description = "Internal Error")
    )
)]
pub async fn create(State(state): State<AppState>, ApiJson(input): ApiJson<NewFeature>) -> Result<(StatusCode, Json<FeatureView>), JsonApiError> {
    let created = state.features.create(&input.title, input.description.as_deref()).await?;
    FEATURES_CREATED_TOTAL.inc();
    info!(id = %created.id, "created feature");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/features", tag = "features",
    responses(
        (status = 200, description = "Features, newest first, with vote counts", body = [crate::openapi::FeatureDoc]),
        (status = 503, description = "Database Unavailable"),
        (status = 500, description = "Internal Error")
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<FeatureView>>, JsonApiError> {
    let list = state.features.list().await?;
    Ok(Json(list))
}

#[utoipa::path(
    get, path = "/features/{feature_id}", tag = "features",
    params(("feature_id" = String, Path, description = "Feature ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::FeatureDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<AppState>, Path(feature_id): Path<String>) -> Result<Json<FeatureView>, JsonApiError> {
    match state.features.get(&feature_id).await? {
        Some(f) => Ok(Json(f)),
        None => Err(service::errors::ServiceError::feature_not_found().into()),
    }
}
