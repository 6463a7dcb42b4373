//! Persistence adapter between the in-memory state and a [`KeyValueStore`].

use crate::{
    domain::{
        board::BoardConfig,
        preferences::{Preferences, Theme},
        workspace::Workspace,
    },
    error::Result,
    storage::{keys, records, KeyValueStore},
};
use std::{fmt, str::FromStr};
use tracing::{info, warn};

/// A top-level field of the persisted state. Each maps to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Change {
    Boards,
    BoardOrder,
    Theme,
    DarkMode,
}

impl Change {
    pub const ALL: [Change; 4] = [
        Change::Boards,
        Change::BoardOrder,
        Change::Theme,
        Change::DarkMode,
    ];

    /// Storage key of the record holding this field
    pub fn key(&self) -> &'static str {
        match self {
            Self::Boards => keys::BOARDS,
            Self::BoardOrder => keys::BOARD_ORDER,
            Self::Theme => keys::THEME,
            Self::DarkMode => keys::DARK_MODE,
        }
    }
}

/// Full state as loaded at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub workspace: Workspace,
    pub preferences: Preferences,
}

pub struct Persistence<S> {
    store: S,
    configs: Vec<BoardConfig>,
}

impl<S: KeyValueStore> Persistence<S> {
    /// Adapter over `store` using the two default boards
    pub fn new(store: S) -> Self {
        Self::with_boards(store, BoardConfig::defaults())
    }

    /// Adapter over `store` with a custom fixed board set, in default order
    pub fn with_boards(store: S, configs: Vec<BoardConfig>) -> Self {
        Self { store, configs }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn configs(&self) -> &[BoardConfig] {
        &self.configs
    }

    pub async fn initialize(&self) -> Result<()> {
        self.store.initialize().await
    }

    /// Loads every record, falling back to defaults for anything missing,
    /// unreadable or malformed. Never fails.
    ///
    /// `height` is the viewport-derived board height used for boards whose
    /// record carries none.
    pub async fn load(&self, height: u32) -> Snapshot {
        let defaults = Workspace::from_configs(&self.configs, height);

        let boards = self
            .read(keys::BOARDS)
            .await
            .and_then(|json| {
                records::decode_boards(&json, &self.configs, height)
                    .map_err(|err| warn_malformed(keys::BOARDS, err))
                    .ok()
            })
            .unwrap_or(defaults.boards);

        let board_order = self
            .read(keys::BOARD_ORDER)
            .await
            .and_then(|json| {
                records::decode_board_order(&json, &defaults.board_order)
                    .map_err(|err| warn_malformed(keys::BOARD_ORDER, err))
                    .ok()
            })
            .unwrap_or(defaults.board_order);

        let theme = self
            .read(keys::THEME)
            .await
            .and_then(|value| {
                Theme::from_str(&value)
                    .map_err(|err| warn_malformed(keys::THEME, err))
                    .ok()
            })
            .unwrap_or_default();

        let dark_mode = self
            .read(keys::DARK_MODE)
            .await
            .is_some_and(|value| value.trim() == "true");

        let workspace = Workspace { boards, board_order };
        info!(
            boards = workspace.board_order.len(),
            tasks = workspace.task_count(),
            theme = %theme,
            dark_mode,
            "state loaded"
        );

        Snapshot {
            workspace,
            preferences: Preferences { theme, dark_mode },
        }
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "unreadable record, using defaults");
                None
            }
        }
    }

    /// Writes the record for one changed field
    pub async fn save(
        &self,
        change: Change,
        workspace: &Workspace,
        preferences: &Preferences,
    ) -> Result<()> {
        let value = match change {
            Change::Boards => records::encode_boards(workspace)?,
            Change::BoardOrder => records::encode_board_order(workspace)?,
            Change::Theme => preferences.theme.to_string(),
            Change::DarkMode => preferences.dark_mode.to_string(),
        };
        self.store.set(change.key(), &value).await
    }

    /// Writes every record
    pub async fn save_all(
        &self,
        workspace: &Workspace,
        preferences: &Preferences,
    ) -> Result<()> {
        for change in Change::ALL {
            self.save(change, workspace, preferences).await?;
        }
        Ok(())
    }
}

fn warn_malformed(key: &str, err: impl fmt::Display) {
    warn!(key, error = %err, "malformed record, using defaults");
}
