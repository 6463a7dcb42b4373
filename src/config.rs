use crate::{
    domain::layout::board_height_for_viewport,
    error::{KanbanError, Result},
    logging,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Store configuration.
///
/// Every field has a default, so a config file only needs the values it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the persisted records
    pub data_dir: PathBuf,
    /// Viewport height in pixels, used to size boards at startup
    pub viewport_height: u32,
    /// Write each change as soon as it happens; otherwise wait for `flush`
    pub autosave: bool,
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_filter: String,
}

impl StoreConfig {
    pub const DEFAULT_DATA_DIR: &'static str = ".kanban";
    pub const CONFIG_FILE: &'static str = "config.json";
    pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 900;

    /// Loads configuration from a JSON file; a missing file yields defaults
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&contents)
            .map_err(|err| KanbanError::ConfigError(format!("{}: {err}", path.display())))
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_viewport_height(mut self, viewport_height: u32) -> Self {
        self.viewport_height = viewport_height;
        self
    }

    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    pub fn with_log_filter(mut self, log_filter: impl Into<String>) -> Self {
        self.log_filter = log_filter.into();
        self
    }

    /// Board height derived from the configured viewport
    pub fn board_height(&self) -> u32 {
        board_height_for_viewport(self.viewport_height)
    }

    /// Installs the global subscriber using `log_filter` as the default
    pub fn init_tracing(&self) -> Result<bool> {
        logging::init_tracing(&self.log_filter)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(Self::DEFAULT_DATA_DIR),
            viewport_height: Self::DEFAULT_VIEWPORT_HEIGHT,
            autosave: true,
            log_filter: "info".to_string(),
        }
    }
}
