use crate::error::Result;
use async_trait::async_trait;

#[cfg(feature = "file-storage")]
pub mod file_store;
pub mod memory_store;
pub mod records;
pub mod snapshot;

#[cfg(feature = "sqlite-storage")]
pub mod sqlite_store;

#[cfg(feature = "file-storage")]
pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use snapshot::{Persistence, Snapshot};

#[cfg(feature = "sqlite-storage")]
pub use sqlite_store::SqliteStore;

/// Names of the persisted records
pub mod keys {
    pub const BOARDS: &str = "kanban-boards";
    pub const THEME: &str = "kanban-theme";
    pub const DARK_MODE: &str = "kanban-darkmode";
    pub const BOARD_ORDER: &str = "kanban-board-order";

    pub const ALL: [&str; 4] = [BOARDS, THEME, DARK_MODE, BOARD_ORDER];
}

/// Durable string-keyed record store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Prepares the backend (directories, tables)
    async fn initialize(&self) -> Result<()>;

    /// Reads a record; `None` when the key was never written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes a record, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
