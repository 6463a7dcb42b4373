//! Interaction surface for the presentation layer.
//!
//! `KanbanStore` owns the workspace and preferences. Every mutation runs to
//! completion in memory first; only then is the change announced and, with
//! autosave on, written to storage. Mutations that change nothing write
//! nothing.

use crate::{
    config::StoreConfig,
    domain::{
        board::BoardId,
        column::ColumnId,
        drag::DragEffect,
        layout::board_height_for_viewport,
        preferences::{Preferences, Theme},
        task::TaskId,
        workspace::{Slot, Workspace},
    },
    error::Result,
    storage::{snapshot::Change, KeyValueStore, Persistence},
};
use std::collections::BTreeSet;
use tokio::sync::broadcast;
use tracing::debug;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

pub struct KanbanStore<S> {
    workspace: Workspace,
    preferences: Preferences,
    persistence: Persistence<S>,
    autosave: bool,
    dirty: BTreeSet<Change>,
    changes: broadcast::Sender<Change>,
}

impl<S: KeyValueStore> KanbanStore<S> {
    /// Opens the store over `store` with the default boards
    pub async fn open(store: S, config: &StoreConfig) -> Result<Self> {
        Self::with_persistence(Persistence::new(store), config).await
    }

    /// Opens the store over a configured persistence adapter
    pub async fn with_persistence(
        persistence: Persistence<S>,
        config: &StoreConfig,
    ) -> Result<Self> {
        persistence.initialize().await?;
        let snapshot = persistence.load(config.board_height()).await;
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

        Ok(Self {
            workspace: snapshot.workspace,
            preferences: snapshot.preferences,
            persistence,
            autosave: config.autosave,
            dirty: BTreeSet::new(),
            changes,
        })
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    /// Receives one notification per applied change
    pub fn subscribe(&self) -> broadcast::Receiver<Change> {
        self.changes.subscribe()
    }

    /// Whether changes are waiting to be written
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    fn mark(&mut self, change: Change) {
        self.dirty.insert(change);
        // No receivers is fine; nobody is rendering yet.
        let _ = self.changes.send(change);
    }

    async fn commit(&mut self, change: Change, changed: bool) -> Result<bool> {
        if !changed {
            return Ok(false);
        }
        self.mark(change);
        if self.autosave {
            self.flush().await?;
        }
        Ok(true)
    }

    /// Writes every dirty record. A failed write stays dirty for the next
    /// flush.
    pub async fn flush(&mut self) -> Result<()> {
        while let Some(change) = self.dirty.first().copied() {
            self.persistence
                .save(change, &self.workspace, &self.preferences)
                .await?;
            self.dirty.remove(&change);
            debug!(key = change.key(), "record written");
        }
        Ok(())
    }

    pub async fn add_task(
        &mut self,
        board_id: &BoardId,
        column_id: &ColumnId,
        text: &str,
    ) -> Result<Option<TaskId>> {
        let id = self.workspace.add_task(board_id, column_id, text);
        self.commit(Change::Boards, id.is_some()).await?;
        Ok(id)
    }

    pub async fn delete_task(
        &mut self,
        board_id: &BoardId,
        column_id: &ColumnId,
        task_id: &TaskId,
    ) -> Result<bool> {
        let changed = self.workspace.delete_task(board_id, column_id, task_id);
        self.commit(Change::Boards, changed).await
    }

    pub async fn update_task(
        &mut self,
        board_id: &BoardId,
        column_id: &ColumnId,
        task_id: &TaskId,
        text: &str,
    ) -> Result<bool> {
        let changed = self
            .workspace
            .update_task(board_id, column_id, task_id, text);
        self.commit(Change::Boards, changed).await
    }

    pub async fn rename_column(
        &mut self,
        board_id: &BoardId,
        column_id: &ColumnId,
        title: &str,
    ) -> Result<bool> {
        let changed = self.workspace.rename_column(board_id, column_id, title);
        self.commit(Change::Boards, changed).await
    }

    pub async fn rename_board(&mut self, board_id: &BoardId, title: &str) -> Result<bool> {
        let changed = self.workspace.rename_board(board_id, title);
        self.commit(Change::Boards, changed).await
    }

    pub async fn toggle_collapsed(&mut self, board_id: &BoardId) -> Result<bool> {
        let changed = self.workspace.toggle_collapsed(board_id);
        self.commit(Change::Boards, changed).await
    }

    pub async fn reorder_columns(
        &mut self,
        board_id: &BoardId,
        from: usize,
        to: usize,
    ) -> Result<bool> {
        let changed = self.workspace.reorder_columns(board_id, from, to);
        self.commit(Change::Boards, changed).await
    }

    pub async fn reorder_boards(&mut self, from: &BoardId, to: &BoardId) -> Result<bool> {
        let changed = self.workspace.reorder_boards(from, to);
        self.commit(Change::BoardOrder, changed).await
    }

    /// Moves a task to the end of another slot
    pub async fn move_task_across_slots(
        &mut self,
        task_id: &TaskId,
        from: &Slot,
        to: &Slot,
    ) -> Result<bool> {
        let changed = self.workspace.move_task(task_id, from, to);
        self.commit(Change::Boards, changed).await
    }

    /// Applies the outcome of a drag transition
    pub async fn apply(&mut self, effect: DragEffect) -> Result<bool> {
        match effect {
            DragEffect::ReorderColumns { board_id, from, to } => {
                self.reorder_columns(&board_id, from, to).await
            }
            DragEffect::ReorderBoards { from, to } => self.reorder_boards(&from, &to).await,
            DragEffect::MoveTask { task_id, from, to } => {
                self.move_task_across_slots(&task_id, &from, &to).await
            }
        }
    }

    pub async fn set_theme(&mut self, theme: Theme) -> Result<bool> {
        let changed = self.preferences.theme != theme;
        self.preferences.theme = theme;
        self.commit(Change::Theme, changed).await
    }

    pub async fn set_dark_mode(&mut self, dark_mode: bool) -> Result<bool> {
        let changed = self.preferences.dark_mode != dark_mode;
        self.preferences.dark_mode = dark_mode;
        self.commit(Change::DarkMode, changed).await
    }

    pub async fn toggle_dark_mode(&mut self) -> Result<bool> {
        self.set_dark_mode(!self.preferences.dark_mode).await
    }

    /// Resizes every board for a new viewport height.
    ///
    /// The board tree is marked dirty but not written; the next committed
    /// change or `flush` carries the new heights.
    pub fn resize_viewport(&mut self, viewport_height: u32) -> bool {
        let changed = self
            .workspace
            .set_heights(board_height_for_viewport(viewport_height));
        if changed {
            self.mark(Change::Boards);
        }
        changed
    }
}

#[cfg(feature = "file-storage")]
impl KanbanStore<crate::storage::FileStore> {
    /// Opens a file-backed store in the configured data directory
    pub async fn open_data_dir(config: &StoreConfig) -> Result<Self> {
        Self::open(crate::storage::FileStore::new(&config.data_dir), config).await
    }
}
