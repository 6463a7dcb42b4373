//! Persisted record layout and merge-with-defaults.
//!
//! The board tree is stored as `{ [boardId]: Board }` with camelCase field
//! names. On load every field is optional: whatever a record carries is
//! overlaid on the hard-coded board, and whatever it lacks (or carries in a
//! shape that would break an invariant) keeps the default.

use crate::{
    domain::{
        board::{Board, BoardConfig, BoardId},
        column::ColumnId,
        reorder::reconcile_order,
        task::{normalize_text, Task, TaskId},
        workspace::Workspace,
    },
    error::Result,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};
use tracing::warn;

/// Persisted shape of one board, as read back from storage
#[derive(Debug, Default)]
pub struct BoardRecord {
    pub title: Option<String>,
    pub tasks: Option<BTreeMap<ColumnId, Vec<Task>>>,
    pub column_order: Option<Vec<ColumnId>>,
    pub column_titles: Option<BTreeMap<ColumnId, String>>,
    pub collapsed: Option<bool>,
    pub height: Option<u32>,
}

impl BoardRecord {
    /// Reads one board's record field by field.
    ///
    /// A field of the wrong shape is skipped and keeps its default; inside
    /// `tasks` and `columnTitles` only the offending entry is skipped.
    pub fn from_value(board_id: &BoardId, value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            warn!(board = %board_id, "board record is not an object, using defaults");
            return Self::default();
        };

        Self {
            title: field(&mut fields, board_id, "title"),
            tasks: field::<Map<String, Value>>(&mut fields, board_id, "tasks")
                .map(|columns| decode_tasks(board_id, columns)),
            column_order: field(&mut fields, board_id, "columnOrder"),
            column_titles: field::<Map<String, Value>>(&mut fields, board_id, "columnTitles")
                .map(|titles| decode_column_titles(board_id, titles)),
            collapsed: field(&mut fields, board_id, "collapsed"),
            height: field(&mut fields, board_id, "height"),
        }
    }

    pub fn merge(self, config: &BoardConfig, height: u32, seen: &mut HashSet<TaskId>) -> Board {
        let mut board = Board::new(config, height);
        let board_id = &config.id;

        if let Some(title) = self.title.as_deref().and_then(normalize_text) {
            board.title = title;
        }

        if let Some(titles) = self.column_titles {
            for (column, title) in titles {
                match (board.column_titles.get_mut(&column), normalize_text(&title)) {
                    (Some(current), Some(title)) => *current = title,
                    (None, _) => warn!(
                        board = %board_id,
                        column = %column,
                        "dropping title of unknown column"
                    ),
                    (Some(_), None) => {}
                }
            }
        }

        if let Some(order) = self.column_order {
            let reconciled = reconcile_order(&order, &board.column_order);
            if reconciled != order {
                warn!(board = %board_id, "repaired persisted column order");
            }
            board.column_order = reconciled;
        }

        if let Some(tasks) = self.tasks {
            for (column, saved) in tasks {
                let Some(slot) = board.tasks.get_mut(&column) else {
                    warn!(
                        board = %board_id,
                        column = %column,
                        dropped = saved.len(),
                        "dropping tasks of unknown column"
                    );
                    continue;
                };
                for task in saved {
                    if task.text.trim().is_empty() {
                        warn!(board = %board_id, task = %task.id, "dropping task with empty text");
                    } else if !seen.insert(task.id) {
                        warn!(board = %board_id, task = %task.id, "dropping duplicated task");
                    } else {
                        slot.push(task);
                    }
                }
            }
        }

        board.collapsed = self.collapsed.unwrap_or(false);
        board.height = self.height.filter(|h| *h > 0).unwrap_or(height);
        board
    }
}

/// Takes `key` out of a board record, skipping it if absent or malformed
fn field<T: DeserializeOwned>(
    fields: &mut Map<String, Value>,
    board_id: &BoardId,
    key: &str,
) -> Option<T> {
    match fields.remove(key)? {
        Value::Null => None,
        value => serde_json::from_value(value)
            .map_err(|err| {
                warn!(
                    board = %board_id,
                    field = key,
                    error = %err,
                    "skipping malformed field"
                );
            })
            .ok(),
    }
}

fn decode_tasks(
    board_id: &BoardId,
    columns: Map<String, Value>,
) -> BTreeMap<ColumnId, Vec<Task>> {
    let mut tasks = BTreeMap::new();
    for (column, saved) in columns {
        let column = ColumnId::new(column);
        let Value::Array(saved) = saved else {
            warn!(
                board = %board_id,
                column = %column,
                "task list is not an array, skipping"
            );
            continue;
        };
        let decoded = saved
            .into_iter()
            .filter_map(|task| match serde_json::from_value::<Task>(task) {
                Ok(task) => Some(task),
                Err(err) => {
                    warn!(
                        board = %board_id,
                        column = %column,
                        error = %err,
                        "dropping malformed task"
                    );
                    None
                }
            })
            .collect();
        tasks.insert(column, decoded);
    }
    tasks
}

fn decode_column_titles(
    board_id: &BoardId,
    titles: Map<String, Value>,
) -> BTreeMap<ColumnId, String> {
    titles
        .into_iter()
        .filter_map(|(column, title)| match title {
            Value::String(title) => Some((ColumnId::new(column), title)),
            _ => {
                warn!(board = %board_id, column = %column, "skipping malformed column title");
                None
            }
        })
        .collect()
}

/// Serializes the board tree (without board order)
pub fn encode_boards(workspace: &Workspace) -> Result<String> {
    Ok(serde_json::to_string(&workspace.boards)?)
}

/// Serializes the board display order
pub fn encode_board_order(workspace: &Workspace) -> Result<String> {
    Ok(serde_json::to_string(&workspace.board_order)?)
}

/// Parses a persisted board tree and merges it onto `configs`.
///
/// Fails only when the document is not a JSON object keyed by board id;
/// callers fall back to the defaults in that case.
pub fn decode_boards(
    json: &str,
    configs: &[BoardConfig],
    height: u32,
) -> Result<BTreeMap<BoardId, Arc<Board>>> {
    let mut records: BTreeMap<BoardId, Value> = serde_json::from_str(json)?;
    let mut seen = HashSet::new();

    let boards = configs
        .iter()
        .map(|config| {
            let record = records
                .remove(&config.id)
                .map(|value| BoardRecord::from_value(&config.id, value))
                .unwrap_or_default();
            let board = record.merge(config, height, &mut seen);
            (config.id.clone(), Arc::new(board))
        })
        .collect();

    for unknown in records.keys() {
        warn!(board = %unknown, "dropping unknown board");
    }
    Ok(boards)
}

/// Parses a persisted board order and reconciles it against `expected`
pub fn decode_board_order(json: &str, expected: &[BoardId]) -> Result<Vec<BoardId>> {
    let saved: Vec<BoardId> = serde_json::from_str(json)?;
    let order = reconcile_order(&saved, expected);
    if order != saved {
        warn!("repaired persisted board order");
    }
    Ok(order)
}
