//! Process-wide persistence handle.
//!
//! Created once at startup and cloned into every repository. A store that
//! could not be opened is still a valid value: each call on it fails fast
//! with `StoreUnavailable` instead of the process refusing to serve.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::errors::ServiceError;

#[derive(Clone)]
pub struct Store {
    conn: Option<DatabaseConnection>,
    reason: Arc<str>,
}

impl Store {
    pub fn connected(db: DatabaseConnection) -> Self {
        Self { conn: Some(db), reason: Arc::from("") }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        let reason: String = reason.into();
        Self { conn: None, reason: Arc::from(reason) }
    }

    pub fn is_available(&self) -> bool { self.conn.is_some() }

    pub fn conn(&self) -> Result<&DatabaseConnection, ServiceError> {
        self.conn.as_ref().ok_or_else(|| {
            warn!(reason = %self.reason, "store not initialized");
            ServiceError::StoreUnavailable(format!("database not initialized: {}", self.reason))
        })
    }

    /// Round-trip to the database.
    pub async fn ping(&self) -> Result<(), ServiceError> {
        self.conn()?.ping().await.map_err(ServiceError::from_db)
    }

    pub async fn close(self) -> Result<(), ServiceError> {
        match self.conn {
            Some(db) => db.close().await.map_err(ServiceError::from_db),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("available", &self.is_available())
            .field("reason", &self.reason)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unavailable_store_fails_fast() {
        let store = Store::unavailable("DATABASE_URL missing");
        assert!(!store.is_available());
        match store.conn() {
            Err(ServiceError::StoreUnavailable(msg)) => assert!(msg.contains("DATABASE_URL missing")),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
        assert!(matches!(store.ping().await, Err(ServiceError::StoreUnavailable(_))));
        assert!(store.close().await.is_ok());
    }
}
