//! Note model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// A unique identifier for a note. Notes are created offline, so the ID is
/// assigned by the client and accepted verbatim on first sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Create a new random note ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A stored note, owned by exactly one user.
///
/// Deletion is logical: a deleted note stays in the store with `is_deleted`
/// set and a fresh `updated_at`, so the deletion propagates through the same
/// changed-since query as any edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier, client-assigned at creation
    pub id: NoteId,
    /// Owning user; never changes after creation
    pub owner_id: UserId,
    /// Note title
    pub title: String,
    /// Note body
    pub body: String,
    /// Tombstone flag
    pub is_deleted: bool,
    /// Server-authoritative last-modified instant
    pub updated_at: DateTime<Utc>,
    /// Pinned flag
    pub is_pinned: bool,
    /// Comma-delimited tag list, empty when untagged
    pub tags: String,
    /// JSON-array-shaped checklist, empty when absent
    pub checklist: String,
    /// Hex color string (`#RRGGBB`) or empty
    pub color_tag: String,
}
