use crate::domain::{
    column::{Column, ColumnConfig, ColumnId},
    reorder,
    task::{normalize_text, Task, TaskId},
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};
use tracing::debug;

/// Stable key of a board, e.g. `work`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(String);

impl BoardId {
    pub const WORK: &'static str = "work";
    pub const LIFE: &'static str = "life";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BoardId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Board configuration: identity, initial title and the fixed column set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub id: BoardId,
    pub title: String,
    pub columns: Vec<ColumnConfig>,
}

impl BoardConfig {
    pub fn work() -> Self {
        Self {
            id: BoardId::new(BoardId::WORK),
            title: "Work".to_string(),
            columns: vec![
                ColumnConfig::new(ColumnId::TODO, "To Do"),
                ColumnConfig::new(ColumnId::IN_PROGRESS, "In Progress"),
                ColumnConfig::new(ColumnId::DONE, "Done"),
            ],
        }
    }

    pub fn life() -> Self {
        Self {
            id: BoardId::new(BoardId::LIFE),
            title: "Life".to_string(),
            columns: vec![
                ColumnConfig::new(ColumnId::TODO, "Personal"),
                ColumnConfig::new(ColumnId::IN_PROGRESS, "Doing"),
                ColumnConfig::new(ColumnId::DONE, "Completed"),
            ],
        }
    }

    /// The two boards every workspace starts with, in display order
    pub fn defaults() -> Vec<Self> {
        vec![Self::work(), Self::life()]
    }
}

/// Kanban board state.
///
/// The set of column ids is fixed at construction: columns can be
/// reordered and renamed, never added or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub(crate) title: String,
    pub(crate) tasks: BTreeMap<ColumnId, Vec<Task>>,
    pub(crate) column_order: Vec<ColumnId>,
    pub(crate) column_titles: BTreeMap<ColumnId, String>,
    pub(crate) collapsed: bool,
    pub(crate) height: u32,
}

impl Board {
    /// Default display height before any viewport is known
    pub const DEFAULT_HEIGHT: u32 = 400;

    pub fn new(config: &BoardConfig, height: u32) -> Self {
        Self {
            title: config.title.clone(),
            tasks: config
                .columns
                .iter()
                .map(|col| (col.id.clone(), Vec::new()))
                .collect(),
            column_order: config.columns.iter().map(|col| col.id.clone()).collect(),
            column_titles: config
                .columns
                .iter()
                .map(|col| (col.id.clone(), col.title.clone()))
                .collect(),
            collapsed: false,
            height,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn column_order(&self) -> &[ColumnId] {
        &self.column_order
    }

    pub fn column_title(&self, column: &ColumnId) -> Option<&str> {
        self.column_titles.get(column).map(String::as_str)
    }

    /// Whether `column` is one of this board's fixed slots
    pub fn has_column(&self, column: &ColumnId) -> bool {
        self.column_titles.contains_key(column)
    }

    /// Tasks of one column in display order; empty for unknown columns
    pub fn tasks(&self, column: &ColumnId) -> &[Task] {
        self.tasks.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Columns in display order
    pub fn columns(&self) -> impl Iterator<Item = Column<'_>> {
        self.column_order.iter().map(move |id| Column {
            id,
            title: self.column_title(id).unwrap_or_default(),
            tasks: self.tasks(id),
        })
    }

    pub fn task_count(&self) -> usize {
        self.tasks.values().map(Vec::len).sum()
    }

    /// Finds the column currently holding `task_id`
    pub fn find_task(&self, task_id: &TaskId) -> Option<&ColumnId> {
        self.tasks
            .iter()
            .find(|(_, tasks)| tasks.iter().any(|task| &task.id == task_id))
            .map(|(column, _)| column)
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Stored display height, kept while collapsed so expanding restores it
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Visible content height: zero while collapsed
    pub fn content_height(&self) -> u32 {
        if self.collapsed {
            0
        } else {
            self.height
        }
    }

    /// Appends a new task to the end of `column`.
    ///
    /// Returns the new task's id, or `None` when the text is blank or the
    /// column does not exist.
    pub fn add_task(&mut self, column: &ColumnId, text: &str) -> Option<TaskId> {
        let tasks = self.tasks.get_mut(column)?;
        let task = Task::new(text)?;
        let id = task.id;
        tasks.push(task);
        debug!(column = %column, task = %id, "task added");
        Some(id)
    }

    /// Removes a task. Deleting an absent task is a no-op.
    pub fn delete_task(&mut self, column: &ColumnId, task_id: &TaskId) -> bool {
        let Some(tasks) = self.tasks.get_mut(column) else {
            return false;
        };
        let before = tasks.len();
        tasks.retain(|task| &task.id != task_id);
        let removed = tasks.len() != before;
        if removed {
            debug!(column = %column, task = %task_id, "task deleted");
        }
        removed
    }

    /// Replaces a task's text. Blank text leaves the task untouched.
    pub fn update_task(&mut self, column: &ColumnId, task_id: &TaskId, text: &str) -> bool {
        let updated = self
            .tasks
            .get_mut(column)
            .and_then(|tasks| tasks.iter_mut().find(|task| &task.id == task_id))
            .map(|task| task.set_text(text))
            .unwrap_or(false);
        if updated {
            debug!(column = %column, task = %task_id, "task updated");
        }
        updated
    }

    /// Renames a column's display title; its id and tasks are untouched
    pub fn rename_column(&mut self, column: &ColumnId, title: &str) -> bool {
        let Some(title) = normalize_text(title) else {
            return false;
        };
        match self.column_titles.get_mut(column) {
            Some(current) if *current != title => {
                debug!(column = %column, title = %title, "column renamed");
                *current = title;
                true
            }
            _ => false,
        }
    }

    /// Splice-moves a column within this board's display order
    pub fn reorder_columns(&mut self, from: usize, to: usize) -> bool {
        let moved = reorder::move_in_place(&mut self.column_order, from, to);
        if moved {
            debug!(from, to, "columns reordered");
        }
        moved
    }

    pub fn rename(&mut self, title: &str) -> bool {
        match normalize_text(title) {
            Some(title) if title != self.title => {
                debug!(title = %title, "board renamed");
                self.title = title;
                true
            }
            _ => false,
        }
    }

    pub fn toggle_collapsed(&mut self) -> bool {
        self.collapsed = !self.collapsed;
        debug!(collapsed = self.collapsed, "board collapse toggled");
        true
    }

    pub fn set_height(&mut self, height: u32) -> bool {
        if self.height == height {
            return false;
        }
        self.height = height;
        true
    }

    /// Detaches a task from `column`, handing ownership to the caller
    pub(crate) fn take_task(&mut self, column: &ColumnId, task_id: &TaskId) -> Option<Task> {
        let tasks = self.tasks.get_mut(column)?;
        let index = tasks.iter().position(|task| &task.id == task_id)?;
        Some(tasks.remove(index))
    }

    /// Appends an existing task to the end of `column`.
    ///
    /// Hands the task back if the column does not exist.
    pub(crate) fn push_task(&mut self, column: &ColumnId, task: Task) -> Result<(), Task> {
        match self.tasks.get_mut(column) {
            Some(tasks) => {
                tasks.push(task);
                Ok(())
            }
            None => Err(task),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(&BoardConfig::work(), Self::DEFAULT_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo() -> ColumnId {
        ColumnId::new(ColumnId::TODO)
    }

    fn done() -> ColumnId {
        ColumnId::new(ColumnId::DONE)
    }

    #[test]
    fn test_board_creation() {
        let board = Board::new(&BoardConfig::life(), 500);

        assert_eq!(board.title(), "Life");
        assert_eq!(board.task_count(), 0);
        assert_eq!(board.height(), 500);
        assert!(!board.is_collapsed());

        let titles: Vec<&str> = board.columns().map(|col| col.title).collect();
        assert_eq!(titles, vec!["Personal", "Doing", "Completed"]);
    }

    #[test]
    fn test_add_task_appends_to_end() {
        let mut board = Board::default();

        let first = board.add_task(&todo(), "First").unwrap();
        let second = board.add_task(&todo(), "Second").unwrap();

        let ids: Vec<TaskId> = board.tasks(&todo()).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![first, second]);
        assert!(board.tasks(&done()).is_empty());

        let first_column = board.columns().next().unwrap();
        assert_eq!(first_column.len(), 2);
        assert!(!first_column.is_empty());
    }

    #[test]
    fn test_add_task_rejects_blank_and_unknown_column() {
        let mut board = Board::default();

        assert!(board.add_task(&todo(), "   ").is_none());
        assert!(board.add_task(&ColumnId::new("backlog"), "Task").is_none());
        assert_eq!(board.task_count(), 0);
    }

    #[test]
    fn test_delete_task_is_idempotent() {
        let mut board = Board::default();
        let id = board.add_task(&todo(), "Task").unwrap();

        assert!(board.delete_task(&todo(), &id));
        assert!(!board.delete_task(&todo(), &id));
        assert_eq!(board.task_count(), 0);
    }

    #[test]
    fn test_delete_task_scoped_to_column() {
        let mut board = Board::default();
        let id = board.add_task(&todo(), "Task").unwrap();

        assert!(!board.delete_task(&done(), &id));
        assert_eq!(board.tasks(&todo()).len(), 1);
    }

    #[test]
    fn test_update_task_rejects_blank() {
        let mut board = Board::default();
        let id = board.add_task(&todo(), "Original").unwrap();

        assert!(!board.update_task(&todo(), &id, "   "));
        assert_eq!(board.tasks(&todo())[0].text, "Original");

        assert!(board.update_task(&todo(), &id, "Edited"));
        assert_eq!(board.tasks(&todo())[0].text, "Edited");
        assert_eq!(board.tasks(&todo())[0].id, id);
    }

    #[test]
    fn test_rename_column() {
        let mut board = Board::default();

        assert!(board.rename_column(&todo(), " Backlog "));
        assert_eq!(board.column_title(&todo()), Some("Backlog"));
        assert_eq!(board.column_order()[0], todo());

        assert!(!board.rename_column(&todo(), ""));
        assert_eq!(board.column_title(&todo()), Some("Backlog"));

        assert!(!board.rename_column(&ColumnId::new("backlog"), "Nope"));
        assert!(!board.has_column(&ColumnId::new("backlog")));
    }

    #[test]
    fn test_reorder_columns() {
        let mut board = Board::default();

        assert!(board.reorder_columns(0, 2));
        let order: Vec<&str> = board.column_order().iter().map(ColumnId::as_str).collect();
        assert_eq!(order, vec!["inprogress", "done", "todo"]);

        assert!(!board.reorder_columns(1, 1));
        assert!(!board.reorder_columns(0, 3));
    }

    #[test]
    fn test_rename_board() {
        let mut board = Board::default();

        assert!(!board.rename(""));
        assert_eq!(board.title(), "Work");

        assert!(board.rename("Office"));
        assert_eq!(board.title(), "Office");
    }

    #[test]
    fn test_collapse_keeps_height() {
        let mut board = Board::new(&BoardConfig::work(), 420);

        board.toggle_collapsed();
        assert!(board.is_collapsed());
        assert_eq!(board.content_height(), 0);
        assert_eq!(board.height(), 420);

        board.toggle_collapsed();
        assert_eq!(board.content_height(), 420);
    }

    #[test]
    fn test_take_and_push_task() {
        let mut board = Board::default();
        let id = board.add_task(&todo(), "Task").unwrap();

        let task = board.take_task(&todo(), &id).unwrap();
        assert_eq!(board.task_count(), 0);

        assert!(board.push_task(&done(), task).is_ok());
        assert_eq!(board.find_task(&id), Some(&done()));

        let stray = Task::new("Stray").unwrap();
        assert!(board.push_task(&ColumnId::new("backlog"), stray).is_err());
    }
}
