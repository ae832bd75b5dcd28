//! # Persistence Layer
//!
//! Small key-value persistence used by the match feed. It holds two independent
//! records: the cached aggregated feed and the notification ledger.
//!
//! ## Architecture
//!
//! - **KeyValueStore**: Abstract trait for different storage backends
//! - **LocalStore**: One JSON file per key under a namespaced data directory
//! - **InMemoryStore**: Process-local map, used by tests
//!
//! Values are opaque strings. Typed access goes through [`load_json`] and
//! [`store_json`].
//!
//! ## Usage
//!
//! ```rust
//! use persistence::{create_local_store, load_json, store_json};
//! use tempfile::TempDir;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let temp_dir = TempDir::new()?;
//!     let store = create_local_store(temp_dir.path(), "example")?;
//!
//!     store_json(&store, "answer", &42u32, None).await?;
//!     let value: Option<u32> = load_json(&store, "answer").await?;
//!     assert_eq!(value, Some(42));
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod local;

pub use backend::{load_json, store_json, InMemoryStore, KeyValueStore, LocalStore, StoredRecord};
pub use config::PersistenceConfig;
pub use error::{PersistenceError, Result};
pub use local::{create_local_store, create_local_store_with_config};
