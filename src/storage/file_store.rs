use crate::{
    error::{KanbanError, Result},
    storage::KeyValueStore,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based store: one file per key under the data directory
pub struct FileStore {
    root_path: PathBuf,
}

impl FileStore {
    const RECORD_EXTENSION: &'static str = "json";
    const TEMP_EXTENSION: &'static str = "tmp";

    /// Creates a new FileStore rooted at `data_dir`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            root_path: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn record_file(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(KanbanError::StorageError(format!(
                "Invalid record key: {key:?}"
            )));
        }
        Ok(self
            .root_path
            .join(format!("{key}.{}", Self::RECORD_EXTENSION)))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let file_path = self.record_file(key)?;

        match fs::read_to_string(&file_path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let file_path = self.record_file(key)?;
        self.ensure_directory_exists(&self.root_path).await?;

        // Write then rename so a crash never leaves a half-written record.
        let temp_path = file_path.with_extension(Self::TEMP_EXTENSION);
        fs::write(&temp_path, value).await?;
        fs::rename(&temp_path, &file_path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::keys;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join(".kanban");
        let store = FileStore::new(&data_dir);

        assert!(!data_dir.exists());
        store.initialize().await.unwrap();
        assert!(data_dir.exists());
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        store.initialize().await.unwrap();

        store.set(keys::THEME, "green").await.unwrap();
        assert_eq!(
            store.get(keys::THEME).await.unwrap().as_deref(),
            Some("green")
        );

        store.set(keys::THEME, "pink").await.unwrap();
        assert_eq!(
            store.get(keys::THEME).await.unwrap().as_deref(),
            Some("pink")
        );
    }

    #[tokio::test]
    async fn test_missing_key_reads_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("never-created"));

        assert!(store.get(keys::BOARDS).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("nested").join("data");
        let store = FileStore::new(&data_dir);

        store.set(keys::DARK_MODE, "true").await.unwrap();
        assert!(data_dir.join("kanban-darkmode.json").exists());
        assert!(!data_dir.join("kanban-darkmode.tmp").exists());
    }

    #[tokio::test]
    async fn test_each_key_has_its_own_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.set(keys::BOARD_ORDER, "[]").await.unwrap();
        store.set(keys::THEME, "blue").await.unwrap();

        assert!(temp_dir.path().join("kanban-board-order.json").exists());
        assert!(temp_dir.path().join("kanban-theme.json").exists());
        assert!(store.get(keys::BOARDS).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        assert!(matches!(
            store.set("../escape", "x").await,
            Err(KanbanError::StorageError(_))
        ));
        assert!(store.get("").await.is_err());
    }
}
