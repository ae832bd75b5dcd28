//! Local file-based store construction

use crate::backend::LocalStore;
use crate::config::PersistenceConfig;
use crate::error::Result;

/// Create a new local store with default settings
pub fn create_local_store(
    data_dir: impl Into<std::path::PathBuf>,
    namespace: impl Into<String>,
) -> Result<LocalStore> {
    LocalStore::new(PersistenceConfig::new(data_dir, namespace))
}

/// Create a new local store with custom configuration
pub fn create_local_store_with_config(config: PersistenceConfig) -> Result<LocalStore> {
    LocalStore::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{load_json, store_json, KeyValueStore};
    use crate::error::PersistenceError;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_local_store_creation() {
        let temp_dir = TempDir::new().unwrap();

        let store = create_local_store(temp_dir.path(), "MatchListCache").unwrap();
        assert!(store.config().namespace_dir().exists());
        assert_eq!(store.config().namespace_dir(), temp_dir.path().join("MatchListCache"));
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_local_store(temp_dir.path(), "feed").unwrap();

        assert_eq!(store.get("matches").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();

        {
            let store = create_local_store(temp_dir.path(), "feed").unwrap();
            store_json(&store, "sentNotifications", &vec!["123"], None).await.unwrap();
        }

        let reopened = create_local_store(temp_dir.path(), "feed").unwrap();
        let loaded: Option<Vec<String>> = load_json(&reopened, "sentNotifications").await.unwrap();
        assert_eq!(loaded, Some(vec!["123".to_string()]));
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let a = create_local_store(temp_dir.path(), "a").unwrap();
        let b = create_local_store(temp_dir.path(), "b").unwrap();

        a.set("key", "from-a".to_string(), None).await.unwrap();
        assert_eq!(b.get("key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_record_reads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_local_store(temp_dir.path(), "feed").unwrap();

        store.set("short", "x".to_string(), Some(Duration::from_millis(1))).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(store.get("short").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_local_store(temp_dir.path(), "feed").unwrap();

        std::fs::write(store.config().namespace_dir().join("matches.json"), "garbage").unwrap();

        let err = store.get("matches").await.unwrap_err();
        assert!(err.is_corruption());
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_local_store(temp_dir.path(), "feed").unwrap();

        let err = store.set("../escape", "x".to_string(), None).await.unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn test_pretty_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = PersistenceConfig {
            pretty: true,
            ..PersistenceConfig::new(temp_dir.path(), "feed")
        };
        let store = create_local_store_with_config(config).unwrap();

        store.set("k", "v".to_string(), None).await.unwrap();
        let written = std::fs::read_to_string(store.config().namespace_dir().join("k.json")).unwrap();
        assert!(written.contains('\n'));
    }
}
