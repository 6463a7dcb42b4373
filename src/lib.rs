//! # Laneboard Core
//!
//! State model for a personal kanban workspace: an ordered set of boards,
//! each with an ordered set of columns holding ordered task lists.
//!
//! The crate owns the orderings and the moves between them (column and
//! board reordering with splice semantics, cross-column and cross-board
//! task moves, live drag sessions) and persists every committed change to
//! a string-keyed store. Rendering and input handling live elsewhere and
//! call into [`KanbanStore`].

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use config::StoreConfig;
pub use domain::{
    board::{Board, BoardConfig, BoardId},
    column::{Column, ColumnConfig, ColumnId},
    drag::{DragEffect, DragSession},
    preferences::{Preferences, Theme},
    task::{Task, TaskId},
    workspace::{Slot, Workspace},
};
pub use error::{KanbanError, Result};
pub use storage::{snapshot::Change, KeyValueStore, MemoryStore, Persistence};
pub use store::KanbanStore;
