pub mod board;
pub mod column;
pub mod drag;
pub mod layout;
pub mod preferences;
pub mod reorder;
pub mod task;
pub mod workspace;

pub use board::{Board, BoardConfig, BoardId};
pub use column::{Column, ColumnConfig, ColumnId};
pub use drag::{DragEffect, DragSession};
pub use layout::board_height_for_viewport;
pub use preferences::{Preferences, Theme};
pub use reorder::move_item;
pub use task::{Task, TaskId};
pub use workspace::{Slot, Workspace};
