use axum::extract::{rejection::JsonRejection, FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

use crate::observability::STORE_ERRORS_TOTAL;

/// JSON error body: `{"error": <title>, "detail": <message|null>}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"error": self.title, "detail": self.detail}))).into_response()
    }
}

/// Maps service conditions to status codes. Store and internal faults are
/// logged here with their cause; callers only see a generic message.
impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let code = e.code();
        match e {
            ServiceError::StoreUnavailable(msg) => {
                STORE_ERRORS_TOTAL.with_label_values(&["unavailable"]).inc();
                error!(code, error = %msg, "database unavailable");
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable", Some("Could not connect to the database.".into()))
            }
            ServiceError::Internal(msg) => {
                STORE_ERRORS_TOTAL.with_label_values(&["internal"]).inc();
                error!(code, error = %msg, "internal error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some("An internal server error occurred.".into()))
            }
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ServiceError::Conflict(msg) => Self::new(StatusCode::CONFLICT, "Conflict", Some(msg)),
            ServiceError::Validation(msg) => {
                warn!(code, error = %msg, "validation failed");
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, "Validation Error", Some(msg))
            }
        }
    }
}

/// Body extraction failures (bad JSON, missing fields, wrong content type)
/// keep their axum status but use the same JSON body as every other error.
impl From<JsonRejection> for JsonApiError {
    fn from(r: JsonRejection) -> Self {
        let status = r.status();
        let title = if status == StatusCode::UNPROCESSABLE_ENTITY {
            "Validation Error"
        } else {
            status.canonical_reason().unwrap_or("Bad Request")
        };
        warn!(status = status.as_u16(), error = %r.body_text(), "request body rejected");
        Self::new(status, title, Some(r.body_text()))
    }
}

/// `Json` extractor whose rejection is a `JsonApiError`.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
}
