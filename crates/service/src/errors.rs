use sea_orm::{sqlx, DbErr, RuntimeErr, SqlErr};
use thiserror::Error;

use models::errors::ModelError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn feature_not_found() -> Self { Self::NotFound("Feature not found.".into()) }

    pub fn already_voted() -> Self { Self::Conflict("Already voted.".into()) }

    /// Classify a driver error: connectivity problems become `StoreUnavailable`,
    /// uniqueness violations `Conflict`, everything else `Internal`.
    pub fn from_db(err: DbErr) -> Self {
        match &err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => Self::StoreUnavailable(err.to_string()),
            DbErr::Exec(rt) | DbErr::Query(rt) if is_connectivity(rt) => Self::StoreUnavailable(err.to_string()),
            DbErr::RecordNotInserted => Self::already_voted(),
            _ => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Self::already_voted(),
                _ => Self::Internal(err.to_string()),
            },
        }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::Conflict(_) => 1002,
            ServiceError::NotFound(_) => 1003,
            ServiceError::StoreUnavailable(_) => 1201,
            ServiceError::Internal(_) => 1200,
        }
    }
}

fn is_connectivity(rt: &RuntimeErr) -> bool {
    matches!(
        rt,
        RuntimeErr::SqlxError(sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Tls(_))
    )
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self { Self::from_db(err) }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(msg) => Self::Validation(msg),
            ModelError::Db(e) => Self::from_db(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ConnAcquireErr;

    #[test]
    fn connection_errors_map_to_store_unavailable() {
        let e = ServiceError::from_db(DbErr::Conn(RuntimeErr::Internal("refused".into())));
        assert!(matches!(e, ServiceError::StoreUnavailable(_)));
        let e = ServiceError::from_db(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout));
        assert!(matches!(e, ServiceError::StoreUnavailable(_)));
        let e = ServiceError::from_db(DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::PoolTimedOut)));
        assert!(matches!(e, ServiceError::StoreUnavailable(_)));
    }

    #[test]
    fn record_not_inserted_is_a_conflict() {
        let e = ServiceError::from_db(DbErr::RecordNotInserted);
        assert!(matches!(e, ServiceError::Conflict(ref m) if m == "Already voted."));
    }

    #[test]
    fn other_errors_are_internal() {
        let e = ServiceError::from_db(DbErr::Custom("boom".into()));
        assert!(matches!(e, ServiceError::Internal(_)));
        assert_eq!(e.code(), 1200);
    }

    #[test]
    fn model_validation_stays_validation() {
        let e: ServiceError = ModelError::Validation("title required".into()).into();
        assert!(matches!(e, ServiceError::Validation(ref m) if m == "title required"));
    }
}
