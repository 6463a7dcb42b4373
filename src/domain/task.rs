use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Unique identifier for a task.
///
/// Backed by a UUIDv7: time-ordered like the timestamps the board used to
/// hand out, but with enough random bits that rapid successive creation
/// never collides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generates a fresh identifier, unique for the life of the process
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for TaskId {
    type Err = crate::error::KanbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| crate::error::KanbanError::InvalidTaskId(s.to_string()))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trims user input and rejects values that are empty or whitespace-only.
///
/// Every text and title edit goes through here; `None` means the edit is
/// dropped and the previous value stays.
pub fn normalize_text(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A single card on a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task from raw user input, or `None` if the text is blank
    pub fn new(text: &str) -> Option<Self> {
        normalize_text(text).map(|text| Self {
            id: TaskId::generate(),
            text,
            created_at: Utc::now(),
        })
    }

    /// Replaces the text, keeping id and creation date.
    ///
    /// Returns `false` when the new text is blank or identical.
    pub fn set_text(&mut self, text: &str) -> bool {
        match normalize_text(text) {
            Some(text) if text != self.text => {
                self.text = text;
                true
            }
            _ => false,
        }
    }

    /// Date label shown under the card
    pub fn created_label(&self) -> String {
        self.created_at.format("%Y-%m-%d").to_string()
    }
}
