use crate::{
    error::{KanbanError, Result},
    storage::KeyValueStore,
};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::{path::Path, sync::Mutex};

/// SQLite-backed store keeping every record in a single `records` table
pub struct SqliteStore {
    connection: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `database_path`
    pub fn open(database_path: impl AsRef<Path>) -> Result<Self> {
        let connection = Connection::open(database_path)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Opens a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory()?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T> {
        let connection = self.connection.lock().map_err(|_| {
            KanbanError::StorageError("SQLite connection poisoned".to_string())
        })?;
        Ok(f(&*connection)?)
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn initialize(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute(
                "CREATE TABLE IF NOT EXISTS records (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
                [],
            )
            .map(|_| ())
        })
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT value FROM records WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
        })
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO records (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map(|_| ())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::keys;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sqlite_set_and_get() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.initialize().await.unwrap();

        assert!(store.get(keys::THEME).await.unwrap().is_none());

        store.set(keys::THEME, "green").await.unwrap();
        store.set(keys::THEME, "purple").await.unwrap();
        assert_eq!(
            store.get(keys::THEME).await.unwrap().as_deref(),
            Some("purple")
        );
        assert!(store.get(keys::BOARDS).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_persists_across_connections() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("kanban.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.initialize().await.unwrap();
            store.set(keys::DARK_MODE, "true").await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        store.initialize().await.unwrap();
        assert_eq!(
            store.get(keys::DARK_MODE).await.unwrap().as_deref(),
            Some("true")
        );
    }
}
