//! Drag-session state machine.
//!
//! The presentation layer owns one `DragSession` and forwards pointer
//! events to it. Transitions only read the workspace; whatever they decide
//! to change comes back as a [`DragEffect`] for the store to apply.

use crate::{
    domain::{
        board::BoardId,
        column::ColumnId,
        task::TaskId,
        workspace::{Slot, Workspace},
    },
    error::{KanbanError, Result},
};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragSession {
    #[default]
    Idle,
    Task {
        task_id: TaskId,
        from: Slot,
    },
    Column {
        board_id: BoardId,
        column_id: ColumnId,
        /// Live index of the dragged column, updated on every reorder
        current_index: usize,
    },
    Board {
        board_id: BoardId,
        /// Board the pointer last crossed onto, cleared when it returns home
        over: Option<BoardId>,
    },
}

/// A mutation requested by a drag transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEffect {
    ReorderColumns {
        board_id: BoardId,
        from: usize,
        to: usize,
    },
    ReorderBoards {
        from: BoardId,
        to: BoardId,
    },
    MoveTask {
        task_id: TaskId,
        from: Slot,
        to: Slot,
    },
}

impl DragSession {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Task { .. } => "task",
            Self::Column { .. } => "column",
            Self::Board { .. } => "board",
        }
    }

    fn begin(&mut self, next: Self) -> Result<()> {
        if self.is_active() {
            return Err(KanbanError::DragInProgress { active: self.kind() });
        }
        debug!(kind = next.kind(), "drag started");
        *self = next;
        Ok(())
    }

    pub fn begin_task(&mut self, task_id: TaskId, from: Slot) -> Result<()> {
        self.begin(Self::Task { task_id, from })
    }

    pub fn begin_column(
        &mut self,
        board_id: BoardId,
        column_id: ColumnId,
        index: usize,
    ) -> Result<()> {
        self.begin(Self::Column {
            board_id,
            column_id,
            current_index: index,
        })
    }

    pub fn begin_board(&mut self, board_id: BoardId) -> Result<()> {
        self.begin(Self::Board {
            board_id,
            over: None,
        })
    }

    /// Pointer crossed the midpoint of column `target_index` on `board_id`.
    ///
    /// Only a column drag that started on the same board reacts; the live
    /// index advances to the target so the next crossing moves from there.
    pub fn column_over(
        &mut self,
        workspace: &Workspace,
        board_id: &BoardId,
        target_index: usize,
    ) -> Option<DragEffect> {
        let Self::Column {
            board_id: origin,
            current_index,
            ..
        } = self
        else {
            return None;
        };
        if origin != board_id || *current_index == target_index {
            return None;
        }
        let columns = workspace.board(board_id)?.column_order().len();
        if *current_index >= columns || target_index >= columns {
            return None;
        }

        let effect = DragEffect::ReorderColumns {
            board_id: board_id.clone(),
            from: *current_index,
            to: target_index,
        };
        *current_index = target_index;
        Some(effect)
    }

    /// Pointer is over board `target` during a board drag.
    ///
    /// Only crossing onto a new board moves the dragged one; resting on the
    /// same target yields nothing until the pointer leaves it.
    pub fn board_over(&mut self, target: &BoardId) -> Option<DragEffect> {
        let Self::Board { board_id, over } = self else {
            return None;
        };
        if board_id == target {
            *over = None;
            return None;
        }
        if over.as_ref() == Some(target) {
            return None;
        }

        *over = Some(target.clone());
        Some(DragEffect::ReorderBoards {
            from: board_id.clone(),
            to: target.clone(),
        })
    }

    /// Task dropped on `target`. Ends a task session whatever the outcome.
    pub fn drop_task(&mut self, target: Slot) -> Option<DragEffect> {
        let session = std::mem::take(self);
        match session {
            Self::Task { task_id, from } if from != target => Some(DragEffect::MoveTask {
                task_id,
                from,
                to: target,
            }),
            Self::Task { .. } => None,
            other => {
                // Not a task drag: leave the other session running.
                *self = other;
                None
            }
        }
    }

    /// Gesture finished or was abandoned; always returns to idle
    pub fn end(&mut self) {
        if self.is_active() {
            debug!(kind = self.kind(), "drag ended");
        }
        *self = Self::Idle;
    }
}
