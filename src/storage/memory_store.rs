use crate::{error::Result, storage::KeyValueStore};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};
use tokio::sync::RwLock;

/// In-process store. Nothing survives the process; useful for embedding
/// and tests.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates records, as if written by an earlier session
    pub fn with_records<I, K, V>(records: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            records: RwLock::new(
                records
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of `set` calls since creation
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.records
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();

        assert!(store.get("kanban-theme").await.unwrap().is_none());
        store.set("kanban-theme", "orange").await.unwrap();
        assert_eq!(
            store.get("kanban-theme").await.unwrap().as_deref(),
            Some("orange")
        );
        assert_eq!(store.write_count(), 1);

        store.set("kanban-theme", "pink").await.unwrap();
        assert_eq!(
            store.get("kanban-theme").await.unwrap().as_deref(),
            Some("pink")
        );
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn test_with_records() {
        let store = MemoryStore::with_records([("kanban-darkmode", "true")]);

        assert_eq!(
            store.get("kanban-darkmode").await.unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(store.write_count(), 0);
    }
}
