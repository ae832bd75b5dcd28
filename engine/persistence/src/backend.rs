//! Key-value store trait and implementations

use crate::config::PersistenceConfig;
use crate::error::{PersistenceError, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Abstract trait for key-value backends
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key was never written or its TTL elapsed.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// With `ttl = None` the record never expires on its own.
    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<()>;
}

/// Envelope written for every key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    pub value: String,
    pub stored_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredRecord {
    fn new(value: String, ttl: Option<Duration>, now: DateTime<Utc>) -> Self {
        let expires_at = ttl
            .and_then(|ttl| chrono::Duration::from_std(ttl).ok())
            .and_then(|ttl| now.checked_add_signed(ttl));
        Self { value, stored_at: now, expires_at }
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if now >= expires_at)
    }
}

/// Read and deserialize a JSON value
pub async fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| PersistenceError::corruption(format!("key '{key}': {e}"))),
        None => Ok(None),
    }
}

/// Serialize and write a JSON value
pub async fn store_json<T, S>(store: &S, key: &str, value: &T, ttl: Option<Duration>) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, raw, ttl).await
}

/// Local file-based backend: one JSON file per key
pub struct LocalStore {
    config: PersistenceConfig,
}

impl LocalStore {
    /// Create a new local store, creating the namespace directory if needed
    pub fn new(config: PersistenceConfig) -> Result<Self> {
        config.validate().map_err(PersistenceError::config)?;

        std::fs::create_dir_all(config.namespace_dir())?;

        tracing::debug!("Local store ready at: {:?}", config.namespace_dir());

        Ok(Self { config })
    }

    /// Get the configuration
    pub fn config(&self) -> &PersistenceConfig {
        &self.config
    }

    fn record_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(PersistenceError::invalid_key(key));
        }
        Ok(self.config.namespace_dir().join(format!("{key}.json")))
    }
}

#[async_trait::async_trait]
impl KeyValueStore for LocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.record_path(key)?;

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: StoredRecord = serde_json::from_str(&contents)
            .map_err(|e| PersistenceError::corruption(format!("{}: {e}", path.display())))?;

        if record.is_expired(Utc::now()) {
            tracing::debug!("Record {} expired at {:?}", key, record.expires_at);
            return Ok(None);
        }

        Ok(Some(record.value))
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<()> {
        let path = self.record_path(key)?;
        let record = StoredRecord::new(value, ttl, Utc::now());

        let body = if self.config.pretty {
            serde_json::to_string_pretty(&record)?
        } else {
            serde_json::to_string(&record)?
        };

        // Write-then-rename so a crash never leaves a half-written record behind
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, body).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        Ok(())
    }
}

/// In-memory backend (for testing)
#[derive(Clone, Default)]
pub struct InMemoryStore {
    records: Arc<Mutex<HashMap<String, StoredRecord>>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a key with an arbitrary string, skipping JSON encoding
    pub async fn insert_raw(&self, key: &str, value: impl Into<String>) {
        let record = StoredRecord::new(value.into(), None, Utc::now());
        self.records.lock().await.insert(key.to_string(), record);
    }

    /// Number of keys currently held (expired ones included)
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Whether the store holds no keys
    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let records = self.records.lock().await;
        Ok(records
            .get(key)
            .filter(|record| !record.is_expired(Utc::now()))
            .map(|record| record.value.clone()))
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<()> {
        let record = StoredRecord::new(value, ttl, Utc::now());
        self.records.lock().await.insert(key.to_string(), record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_roundtrip() {
        let store = InMemoryStore::new();
        assert!(store.is_empty().await);

        store.set("matches", "[]".to_string(), None).await.unwrap();
        assert_eq!(store.get("matches").await.unwrap(), Some("[]".to_string()));
        assert_eq!(store.get("missing").await.unwrap(), None);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_in_memory_ttl_expiry() {
        let store = InMemoryStore::new();
        store.set("short", "x".to_string(), Some(Duration::from_millis(1))).await.unwrap();
        store.set("long", "y".to_string(), Some(Duration::from_secs(3600))).await.unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(store.get("short").await.unwrap(), None);
        assert_eq!(store.get("long").await.unwrap(), Some("y".to_string()));
    }

    #[tokio::test]
    async fn test_load_json_reports_corruption() {
        let store = InMemoryStore::new();
        store.insert_raw("ledger", "{not json").await;

        let err = load_json::<HashMap<String, String>, _>(&store, "ledger").await.unwrap_err();
        assert!(err.is_corruption());
    }

    #[tokio::test]
    async fn test_json_helpers_through_trait_object() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());

        store_json(store.as_ref(), "numbers", &vec![1, 2, 3], None).await.unwrap();
        let loaded: Option<Vec<i32>> = load_json(store.as_ref(), "numbers").await.unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }
}
