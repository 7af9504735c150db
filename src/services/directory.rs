use crate::models::{Investor, Startup};
use crate::services::fallback::{demo_investors, demo_startups};
use crate::services::postgres::{PostgresClient, PostgresError};
use std::sync::Arc;
use thiserror::Error;

/// Errors from looking up startups and investors
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Database error: {0}")]
    Store(PostgresError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No data source configured")]
    NoDataSource,
}

impl From<PostgresError> for DirectoryError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::NotFound(what) => DirectoryError::NotFound(what),
            PostgresError::InvalidInput(what) => DirectoryError::InvalidInput(what),
            other => DirectoryError::Store(other),
        }
    }
}

/// Startup and investor lookups with optional demo fallback.
///
/// With `use_fallback_data` set, a missing or failing store is answered
/// from the built-in demo records instead of returning an error.
#[derive(Clone)]
pub struct InvestorDirectory {
    store: Option<Arc<PostgresClient>>,
    use_fallback_data: bool,
    scan_limit: usize,
}

impl InvestorDirectory {
    pub fn new(store: Option<Arc<PostgresClient>>, use_fallback_data: bool, scan_limit: usize) -> Self {
        Self {
            store,
            use_fallback_data,
            scan_limit,
        }
    }

    pub fn uses_fallback(&self) -> bool {
        self.use_fallback_data
    }

    pub fn store(&self) -> Option<&Arc<PostgresClient>> {
        self.store.as_ref()
    }

    pub async fn startup(&self, id: &str) -> Result<Startup, DirectoryError> {
        let stored = match &self.store {
            Some(store) => Some(store.get_startup(id).await),
            None => None,
        };

        self.or_fallback(stored, "startup", || {
            demo_startups()
                .into_iter()
                .find(|s| s.id == id)
                .ok_or_else(|| DirectoryError::NotFound(format!("Startup {}", id)))
        })
    }

    pub async fn investor(&self, id: &str) -> Result<Investor, DirectoryError> {
        let stored = match &self.store {
            Some(store) => Some(store.get_investor(id).await),
            None => None,
        };

        self.or_fallback(stored, "investor", || {
            demo_investors()
                .into_iter()
                .find(|i| i.id == id)
                .ok_or_else(|| DirectoryError::NotFound(format!("Investor {}", id)))
        })
    }

    pub async fn investors(&self) -> Result<Vec<Investor>, DirectoryError> {
        let stored = match &self.store {
            Some(store) => Some(store.list_investors(self.scan_limit).await),
            None => None,
        };

        self.or_fallback(stored, "investors", || Ok(demo_investors()))
    }

    pub async fn startups(&self) -> Result<Vec<Startup>, DirectoryError> {
        let stored = match &self.store {
            Some(store) => Some(store.list_startups(self.scan_limit).await),
            None => None,
        };

        self.or_fallback(stored, "startups", || Ok(demo_startups()))
    }

    fn or_fallback<T>(
        &self,
        stored: Option<Result<T, PostgresError>>,
        what: &str,
        fallback: impl FnOnce() -> Result<T, DirectoryError>,
    ) -> Result<T, DirectoryError> {
        match stored {
            Some(Ok(value)) => Ok(value),
            Some(Err(e)) if self.use_fallback_data => {
                tracing::warn!("Loading {} failed ({}), serving demo data", what, e);
                fallback()
            }
            Some(Err(e)) => Err(e.into()),
            None if self.use_fallback_data => {
                tracing::debug!("No store configured, serving demo {}", what);
                fallback()
            }
            None => Err(DirectoryError::NoDataSource),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fallback_serves_demo_data() {
        let directory = InvestorDirectory::new(None, true, 100);

        let investors = directory.investors().await.unwrap();
        assert!(!investors.is_empty());

        let startup = directory.startup("demo-startup-ledgerloop").await.unwrap();
        assert_eq!(startup.name, "LedgerLoop");

        assert!(matches!(
            directory.investor("missing").await,
            Err(DirectoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_without_fallback_needs_a_store() {
        let directory = InvestorDirectory::new(None, false, 100);
        assert!(matches!(directory.startups().await, Err(DirectoryError::NoDataSource)));
    }

    #[test]
    fn test_store_errors_map_to_directory_errors() {
        let err: DirectoryError = PostgresError::NotFound("Startup x".to_string()).into();
        assert!(matches!(err, DirectoryError::NotFound(_)));
    }
}
