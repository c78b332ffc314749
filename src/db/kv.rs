//! Durable key-value storage seam

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::repositories::kv::KvRepository;

/// String-keyed, string-valued storage the store persists its collections into
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under a key, `None` if it was never written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under a key
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[async_trait]
impl KeyValueStore for KvRepository {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        KvRepository::get(self, key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        KvRepository::set(self, key, value).await
    }
}

/// Process-local storage, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing entries, e.g. a snapshot taken from another store
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
