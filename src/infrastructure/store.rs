//! Remote Store Gateway.
//!
//! Every read and write against the hosted database goes through [`RemoteStoreGateway`].
//! It reports "not configured" when the URL or the key is missing. It bounds each call with
//! a deadline, makes a single attempt, and turns every failure into a [`StoreError`] value.
//! Rows cross the boundary as JSON and are decoded into typed records here.

use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{error, warn};
use url::Url;

use crate::{
    entities::resource::{OrderBy, Resource},
    errors::StoreError,
    settings::AppConfig,
};

pub mod memory;
pub mod postgres;
pub mod postgrest;

use memory::MemoryBackend;
use postgres::PgBackend;
use postgrest::PostgrestBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Postgrest,
    Postgres,
    Memory,
}

/// Equality filter on a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub table: &'static str,
    pub filter: Option<Filter>,
    pub order: Option<OrderBy>,
}

/// Raw row access to one kind of external store.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, StoreError>;

    /// Inserts one row and returns it as stored, with id and timestamps filled in.
    async fn insert(&self, table: &'static str, row: Value) -> Result<Value, StoreError>;

    /// `Ok(None)` when no row has the given id.
    async fn update(&self, table: &'static str, id: &str, patch: Value) -> Result<Option<Value>, StoreError>;

    /// `Ok(false)` when no row has the given id.
    async fn delete(&self, table: &'static str, id: &str) -> Result<bool, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct RemoteStoreGateway {
    backend: Option<Arc<dyn StoreBackend>>,
    timeout: Duration,
}

impl RemoteStoreGateway {
    pub fn new(backend: Arc<dyn StoreBackend>, timeout: Duration) -> Self {
        RemoteStoreGateway { backend: Some(backend), timeout }
    }

    pub fn unconfigured() -> Self {
        RemoteStoreGateway { backend: None, timeout: Duration::from_secs(crate::constants::DEFAULT_STORE_TIMEOUT_SECS) }
    }

    /// Picks a backend from the scheme of the configured store URL.
    ///
    /// Missing URL or key is degraded mode, not an error.
    pub fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        let timeout = Duration::from_secs(config.store_timeout_secs);

        let (Some(raw_url), Some(key)) = (config.store_url(), config.store_key()) else {
            warn!("Store URL or key missing; reads will use fallback data and writes will be rejected");
            return Ok(RemoteStoreGateway { backend: None, timeout });
        };

        let url = Url::parse(raw_url)
            .map_err(|e| StoreError::InvalidConfig(format!("store URL is not a valid URL: {e}")))?;

        let backend: Arc<dyn StoreBackend> = match url.scheme() {
            "http" | "https" => Arc::new(PostgrestBackend::new(&url, key, timeout)?),
            "postgres" | "postgresql" => Arc::new(PgBackend::connect_lazy(raw_url, key, timeout)?),
            "memory" => Arc::new(MemoryBackend::new()),
            other => {
                return Err(StoreError::InvalidConfig(format!("unsupported store scheme `{other}`")));
            }
        };

        tracing::info!(backend = ?backend.kind(), "Remote store configured");
        Ok(RemoteStoreGateway::new(backend, timeout))
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend_kind(&self) -> Option<BackendKind> {
        self.backend.as_ref().map(|b| b.kind())
    }

    /// Runs `op` against the backend, if there is one.
    ///
    /// Never calls `op` when unconfigured. One attempt, bounded by the gateway timeout.
    pub async fn safe_operation<T, F, Fut>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(Arc<dyn StoreBackend>) -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let Some(backend) = self.backend.clone() else {
            return Err(StoreError::NotConfigured);
        };

        match tokio::time::timeout(self.timeout, op(backend)).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                error!(error = %e, "Store operation failed");
                Err(e)
            }
            Err(_) => {
                let e = StoreError::Timeout(self.timeout.as_secs());
                error!(error = %e, "Store operation failed");
                Err(e)
            }
        }
    }

    pub async fn select_all<R: Resource>(&self) -> Result<Vec<R>, StoreError> {
        let query = SelectQuery { table: R::TABLE, filter: None, order: Some(R::ORDER) };
        let rows = self.safe_operation(|b| async move { b.select(&query).await }).await?;
        decode_rows(rows)
    }

    pub async fn select_where<R: Resource>(&self, column: &'static str, value: &str) -> Result<Vec<R>, StoreError> {
        let query = SelectQuery {
            table: R::TABLE,
            filter: Some(Filter { column, value: value.to_string() }),
            order: None,
        };
        let rows = self.safe_operation(|b| async move { b.select(&query).await }).await?;
        decode_rows(rows)
    }

    pub async fn insert<R: Resource>(&self, row: Value) -> Result<R, StoreError> {
        let stored = self.insert_row(R::TABLE, row).await?;
        decode_row(stored)
    }

    pub async fn update<R: Resource>(&self, id: &str, patch: Value) -> Result<Option<R>, StoreError> {
        let updated = self
            .safe_operation(|b| async move { b.update(R::TABLE, id, patch).await })
            .await?;
        updated.map(decode_row).transpose()
    }

    pub async fn delete<R: Resource>(&self, id: &str) -> Result<bool, StoreError> {
        self.safe_operation(|b| async move { b.delete(R::TABLE, id).await }).await
    }

    /// Untyped insert for tables that are written but never listed.
    pub async fn insert_row(&self, table: &'static str, row: Value) -> Result<Value, StoreError> {
        self.safe_operation(|b| async move { b.insert(table, row).await }).await
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.safe_operation(|b| async move { b.ping().await }).await
    }
}

fn decode_row<T: DeserializeOwned>(row: Value) -> Result<T, StoreError> {
    serde_json::from_value(row).map_err(|e| StoreError::Decode(e.to_string()))
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, StoreError> {
    rows.into_iter().map(decode_row).collect()
}

/// Serializes a payload to a JSON object and stamps `updated_at`.
pub fn with_updated_at<T: Serialize>(fields: &T) -> Result<Value, StoreError> {
    let mut value = serde_json::to_value(fields)?;
    let Some(object) = value.as_object_mut() else {
        return Err(StoreError::Decode("payload must serialize to a JSON object".into()));
    };
    object.insert("updated_at".into(), serde_json::to_value(chrono::Utc::now())?);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl StoreBackend for CountingBackend {
        fn kind(&self) -> BackendKind {
            BackendKind::Memory
        }
        async fn select(&self, _query: &SelectQuery) -> Result<Vec<Value>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![])
        }
        async fn insert(&self, _table: &'static str, _row: Value) -> Result<Value, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Database("insert refused".into()))
        }
        async fn update(&self, _table: &'static str, _id: &str, _patch: Value) -> Result<Option<Value>, StoreError> {
            Ok(None)
        }
        async fn delete(&self, _table: &'static str, _id: &str) -> Result<bool, StoreError> {
            Ok(false)
        }
        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn unconfigured_gateway_never_calls_the_operation() {
        let gateway = RemoteStoreGateway::unconfigured();
        let mut called = false;

        let result: Result<(), StoreError> = gateway
            .safe_operation(|_| {
                called = true;
                async { Ok(()) }
            })
            .await;

        assert!(!gateway.is_configured());
        assert_eq!(result, Err(StoreError::NotConfigured));
        assert!(!called);
    }

    #[tokio::test]
    async fn failures_come_back_as_values() {
        let backend = Arc::new(CountingBackend { calls: AtomicUsize::new(0) });
        let gateway = RemoteStoreGateway::new(backend.clone(), Duration::from_secs(1));

        let result = gateway.insert_row("skills", serde_json::json!({"name": "Rust"})).await;

        assert_eq!(result, Err(StoreError::Database("insert refused".into())));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1, "no retries");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_calls_time_out() {
        let backend = Arc::new(CountingBackend { calls: AtomicUsize::new(0) });
        let gateway = RemoteStoreGateway::new(backend, Duration::from_secs(1));

        let result = gateway.select_all::<crate::entities::skill::Skill>().await;

        assert_eq!(result, Err(StoreError::Timeout(1)));
    }

    #[test]
    fn updated_at_is_stamped_onto_payload() {
        let value = with_updated_at(&serde_json::json!({"level": 77})).unwrap();
        assert_eq!(value["level"], 77);
        assert!(value["updated_at"].is_string());
    }
}
