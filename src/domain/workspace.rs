//! Root of the state tree: every board plus the board display order.
//!
//! Boards are held behind `Arc` and mutated through `Arc::make_mut`, so a
//! clone of the workspace taken before a mutation keeps sharing every board
//! the mutation did not touch.

use crate::{
    domain::{
        board::{Board, BoardConfig, BoardId},
        column::ColumnId,
        reorder,
        task::TaskId,
    },
    error::{KanbanError, Result},
};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashSet},
    fmt,
    sync::Arc,
};
use tracing::{debug, warn};

/// A task's container: the `(board, column)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub board_id: BoardId,
    pub column_id: ColumnId,
}

impl Slot {
    pub fn new(board_id: impl Into<BoardId>, column_id: impl Into<ColumnId>) -> Self {
        Self {
            board_id: board_id.into(),
            column_id: column_id.into(),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.board_id, self.column_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub(crate) boards: BTreeMap<BoardId, Arc<Board>>,
    pub(crate) board_order: Vec<BoardId>,
}

impl Workspace {
    /// Builds a workspace from board configurations, in the given order
    pub fn from_configs(configs: &[BoardConfig], height: u32) -> Self {
        Self {
            boards: configs
                .iter()
                .map(|config| (config.id.clone(), Arc::new(Board::new(config, height))))
                .collect(),
            board_order: configs.iter().map(|config| config.id.clone()).collect(),
        }
    }

    pub fn board(&self, board_id: &BoardId) -> Option<&Board> {
        self.boards.get(board_id).map(Arc::as_ref)
    }

    /// Shared handle to a board, for cheap snapshots
    pub fn board_arc(&self, board_id: &BoardId) -> Option<&Arc<Board>> {
        self.boards.get(board_id)
    }

    pub fn board_order(&self) -> &[BoardId] {
        &self.board_order
    }

    /// Boards in display order
    pub fn boards(&self) -> impl Iterator<Item = (&BoardId, &Board)> {
        self.board_order
            .iter()
            .filter_map(move |id| self.boards.get(id).map(|board| (id, board.as_ref())))
    }

    pub fn task_count(&self) -> usize {
        self.boards.values().map(|board| board.task_count()).sum()
    }

    /// Finds the slot currently holding `task_id`
    pub fn find_task(&self, task_id: &TaskId) -> Option<Slot> {
        self.boards.iter().find_map(|(board_id, board)| {
            board.find_task(task_id).map(|column_id| Slot {
                board_id: board_id.clone(),
                column_id: column_id.clone(),
            })
        })
    }

    fn board_mut(&mut self, board_id: &BoardId) -> Option<&mut Board> {
        self.boards.get_mut(board_id).map(Arc::make_mut)
    }

    fn with_board<T: Default>(
        &mut self,
        board_id: &BoardId,
        f: impl FnOnce(&mut Board) -> T,
    ) -> T {
        match self.board_mut(board_id) {
            Some(board) => f(board),
            None => T::default(),
        }
    }

    pub fn add_task(
        &mut self,
        board_id: &BoardId,
        column_id: &ColumnId,
        text: &str,
    ) -> Option<TaskId> {
        self.board_mut(board_id)?.add_task(column_id, text)
    }

    pub fn delete_task(
        &mut self,
        board_id: &BoardId,
        column_id: &ColumnId,
        task_id: &TaskId,
    ) -> bool {
        self.with_board(board_id, |b| b.delete_task(column_id, task_id))
    }

    pub fn update_task(
        &mut self,
        board_id: &BoardId,
        column_id: &ColumnId,
        task_id: &TaskId,
        text: &str,
    ) -> bool {
        self.with_board(board_id, |b| b.update_task(column_id, task_id, text))
    }

    pub fn rename_column(
        &mut self,
        board_id: &BoardId,
        column_id: &ColumnId,
        title: &str,
    ) -> bool {
        self.with_board(board_id, |b| b.rename_column(column_id, title))
    }

    /// Reorders columns of a single board; other boards are never touched
    pub fn reorder_columns(&mut self, board_id: &BoardId, from: usize, to: usize) -> bool {
        self.with_board(board_id, |board| board.reorder_columns(from, to))
    }

    pub fn rename_board(&mut self, board_id: &BoardId, title: &str) -> bool {
        self.with_board(board_id, |board| board.rename(title))
    }

    pub fn toggle_collapsed(&mut self, board_id: &BoardId) -> bool {
        self.with_board(board_id, Board::toggle_collapsed)
    }

    /// Moves `from` to the position currently occupied by `to`
    pub fn reorder_boards(&mut self, from: &BoardId, to: &BoardId) -> bool {
        let moved = reorder::move_to_position_of(&mut self.board_order, from, to);
        if moved {
            debug!(from = %from, to = %to, "boards reordered");
        }
        moved
    }

    /// Applies a viewport-derived height to every board
    pub fn set_heights(&mut self, height: u32) -> bool {
        let ids: Vec<BoardId> = self.boards.keys().cloned().collect();
        ids.iter().fold(false, |changed, id| {
            self.with_board(id, |board| board.set_height(height)) || changed
        })
    }

    /// Relocates a task to the end of another slot.
    ///
    /// Dropping onto the originating slot, an unknown target, or a task not
    /// present in `from` are all no-ops. The task is checked against both
    /// slots before anything is detached, so it is never lost or doubled.
    pub fn move_task(&mut self, task_id: &TaskId, from: &Slot, to: &Slot) -> bool {
        if from == to {
            return false;
        }
        let target_exists = self
            .board(&to.board_id)
            .is_some_and(|board| board.has_column(&to.column_id));
        let source_has_task = self.board(&from.board_id).is_some_and(|board| {
            board
                .tasks(&from.column_id)
                .iter()
                .any(|task| &task.id == task_id)
        });
        if !target_exists || !source_has_task {
            return false;
        }

        let Some(task) = self
            .board_mut(&from.board_id)
            .and_then(|board| board.take_task(&from.column_id, task_id))
        else {
            return false;
        };

        let placed = match self.board_mut(&to.board_id) {
            Some(board) => board.push_task(&to.column_id, task),
            None => Err(task),
        };
        if let Err(task) = placed {
            // Unreachable after the checks above; put the task back rather than drop it.
            let restored = self
                .board_mut(&from.board_id)
                .map(|board| board.push_task(&from.column_id, task));
            if !matches!(restored, Some(Ok(()))) {
                warn!(task = %task_id, from = %from, "task lost while restoring a failed move");
            }
            debug_assert!(false, "move of {task_id} passed its checks but failed");
            return false;
        }

        debug!(task = %task_id, from = %from, to = %to, "task moved");
        true
    }

    /// Checks the ordering and ownership invariants of the whole tree
    pub fn validate(&self) -> Result<()> {
        let keys: HashSet<&BoardId> = self.boards.keys().collect();
        let ordered: HashSet<&BoardId> = self.board_order.iter().collect();
        if ordered.len() != self.board_order.len() || ordered != keys {
            return Err(KanbanError::InvariantViolation(format!(
                "board order {:?} is not a permutation of the board set",
                self.board_order
            )));
        }

        let mut seen_tasks: HashSet<TaskId> = HashSet::new();
        for (board_id, board) in &self.boards {
            if board.title.trim().is_empty() {
                return Err(KanbanError::InvariantViolation(format!(
                    "board {board_id} has an empty title"
                )));
            }

            let column_set: HashSet<&ColumnId> = board.column_titles.keys().collect();
            let column_order: HashSet<&ColumnId> = board.column_order.iter().collect();
            if column_order.len() != board.column_order.len() || column_order != column_set {
                return Err(KanbanError::InvariantViolation(format!(
                    "column order of board {board_id} is not a permutation of its columns"
                )));
            }
            let task_columns: HashSet<&ColumnId> = board.tasks.keys().collect();
            if task_columns != column_set {
                return Err(KanbanError::InvariantViolation(format!(
                    "task lists of board {board_id} do not match its columns"
                )));
            }

            for (column_id, title) in &board.column_titles {
                if title.trim().is_empty() {
                    return Err(KanbanError::InvariantViolation(format!(
                        "column {board_id}/{column_id} has an empty title"
                    )));
                }
            }

            for (column_id, tasks) in &board.tasks {
                for task in tasks {
                    if task.text.trim().is_empty() {
                        return Err(KanbanError::InvariantViolation(format!(
                            "task {} in {board_id}/{column_id} has empty text",
                            task.id
                        )));
                    }
                    if !seen_tasks.insert(task.id) {
                        return Err(KanbanError::InvariantViolation(format!(
                            "task {} appears in more than one slot",
                            task.id
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::from_configs(&BoardConfig::defaults(), Board::DEFAULT_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work() -> BoardId {
        BoardId::new(BoardId::WORK)
    }

    fn life() -> BoardId {
        BoardId::new(BoardId::LIFE)
    }

    fn col(id: &str) -> ColumnId {
        ColumnId::new(id)
    }

    #[test]
    fn test_default_workspace() {
        let ws = Workspace::default();

        assert_eq!(ws.board_order(), &[work(), life()]);
        assert_eq!(ws.board(&work()).unwrap().title(), "Work");
        assert_eq!(ws.board(&life()).unwrap().title(), "Life");
        assert!(ws.validate().is_ok());
    }

    #[test]
    fn test_cross_column_move() {
        let mut ws = Workspace::default();
        ws.add_task(&work(), &col("done"), "Already done").unwrap();
        let id = ws.add_task(&work(), &col("todo"), "Ship it").unwrap();
        let total = ws.task_count();

        let todo = Slot::new("work", "todo");
        assert!(ws.move_task(&id, &todo, &Slot::new("work", "done")));

        let board = ws.board(&work()).unwrap();
        assert!(board.tasks(&col("todo")).is_empty());
        let done = board.tasks(&col("done"));
        assert_eq!(done.iter().filter(|t| t.id == id).count(), 1);
        assert_eq!(done.last().unwrap().id, id);
        assert_eq!(ws.task_count(), total);
        assert!(ws.validate().is_ok());
    }

    #[test]
    fn test_cross_board_move() {
        let mut ws = Workspace::default();
        let id = ws.add_task(&work(), &col("inprogress"), "Dentist").unwrap();

        let from = Slot::new("work", "inprogress");
        assert!(ws.move_task(&id, &from, &Slot::new("life", "todo")));
        assert_eq!(ws.find_task(&id), Some(Slot::new("life", "todo")));
        assert_eq!(ws.board(&work()).unwrap().task_count(), 0);
        assert!(ws.validate().is_ok());
    }

    #[test]
    fn test_same_slot_move_is_noop() {
        let mut ws = Workspace::default();
        let first = ws.add_task(&work(), &col("todo"), "First").unwrap();
        let second = ws.add_task(&work(), &col("todo"), "Second").unwrap();
        let before = ws.clone();

        let slot = Slot::new("work", "todo");
        assert!(!ws.move_task(&first, &slot, &slot));
        assert!(!ws.move_task(&first, &slot, &slot));

        assert_eq!(ws, before);
        let ids: Vec<TaskId> = ws
            .board(&work())
            .unwrap()
            .tasks(&col("todo"))
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn test_move_to_unknown_target_keeps_task() {
        let mut ws = Workspace::default();
        let id = ws.add_task(&work(), &col("todo"), "Task").unwrap();

        let from = Slot::new("work", "todo");
        assert!(!ws.move_task(&id, &from, &Slot::new("work", "backlog")));
        assert!(!ws.move_task(&id, &from, &Slot::new("side", "todo")));
        assert_eq!(ws.find_task(&id), Some(Slot::new("work", "todo")));
    }

    #[test]
    fn test_move_from_wrong_source_is_noop() {
        let mut ws = Workspace::default();
        let id = ws.add_task(&work(), &col("todo"), "Task").unwrap();
        let before = ws.clone();

        let wrong = Slot::new("work", "done");
        assert!(!ws.move_task(&id, &wrong, &Slot::new("life", "todo")));
        assert_eq!(ws, before);
    }

    #[test]
    fn test_move_leaves_orders_untouched() {
        let mut ws = Workspace::default();
        ws.reorder_columns(&work(), 2, 0);
        let id = ws.add_task(&work(), &col("todo"), "Task").unwrap();
        let column_order = ws.board(&work()).unwrap().column_order().to_vec();
        let board_order = ws.board_order().to_vec();

        ws.move_task(&id, &Slot::new("work", "todo"), &Slot::new("life", "done"));

        let work_board = ws.board(&work()).unwrap();
        assert_eq!(work_board.column_order(), column_order.as_slice());
        assert_eq!(ws.board_order(), board_order.as_slice());
    }

    #[test]
    fn test_reorder_boards() {
        let mut ws = Workspace::default();

        assert!(ws.reorder_boards(&work(), &life()));
        assert_eq!(ws.board_order(), &[life(), work()]);

        assert!(!ws.reorder_boards(&work(), &work()));
        assert!(!ws.reorder_boards(&BoardId::new("side"), &work()));
        assert_eq!(ws.board_order(), &[life(), work()]);
        assert!(ws.validate().is_ok());
    }

    #[test]
    fn test_reorder_columns_scoped_to_board() {
        let mut ws = Workspace::default();
        let life_order = ws.board(&life()).unwrap().column_order().to_vec();

        assert!(ws.reorder_columns(&work(), 0, 2));
        let life_board = ws.board(&life()).unwrap();
        assert_eq!(life_board.column_order(), life_order.as_slice());
        assert!(!ws.reorder_columns(&BoardId::new("side"), 0, 1));
    }

    #[test]
    fn test_mutation_shares_untouched_boards() {
        let mut ws = Workspace::default();
        let snapshot = ws.clone();

        ws.add_task(&work(), &col("todo"), "Task").unwrap();

        assert!(Arc::ptr_eq(
            snapshot.board_arc(&life()).unwrap(),
            ws.board_arc(&life()).unwrap()
        ));
        assert!(!Arc::ptr_eq(
            snapshot.board_arc(&work()).unwrap(),
            ws.board_arc(&work()).unwrap()
        ));
        assert_eq!(snapshot.task_count(), 0);
    }

    #[test]
    fn test_set_heights() {
        let mut ws = Workspace::default();

        assert!(ws.set_heights(350));
        assert!(ws.boards().all(|(_, board)| board.height() == 350));
        assert!(!ws.set_heights(350));
    }

    #[test]
    fn test_validate_detects_broken_board_order() {
        let mut ws = Workspace::default();
        ws.board_order = vec![work(), work()];
        assert!(matches!(ws.validate(), Err(KanbanError::InvariantViolation(_))));

        ws.board_order = vec![work()];
        assert!(ws.validate().is_err());

        ws.board_order = vec![work(), life(), BoardId::new("side")];
        assert!(ws.validate().is_err());
    }

    #[test]
    fn test_validate_detects_duplicated_task() {
        let mut ws = Workspace::default();
        let id = ws.add_task(&work(), &col("todo"), "Task").unwrap();
        let task = ws.board(&work()).unwrap().tasks(&col("todo"))[0].clone();
        Arc::make_mut(ws.boards.get_mut(&life()).unwrap())
            .push_task(&col("done"), task)
            .unwrap();

        assert!(ws.validate().is_err());
        assert!(ws.find_task(&id).is_some());
    }
}
