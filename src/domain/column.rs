use crate::domain::task::Task;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Board-scoped lane key, e.g. `todo`.
///
/// The id is the column's identity and never changes; the display title is
/// stored separately and can be renamed freely.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    pub const TODO: &'static str = "todo";
    pub const IN_PROGRESS: &'static str = "inprogress";
    pub const DONE: &'static str = "done";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Configuration for a board column: its fixed slot and initial title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub id: ColumnId,
    pub title: String,
}

impl ColumnConfig {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: ColumnId::new(id),
            title: title.to_string(),
        }
    }
}

/// Read-only view of one column, assembled from a board's order, title and
/// task maps
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub id: &'a ColumnId,
    pub title: &'a str,
    pub tasks: &'a [Task],
}

impl Column<'_> {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
