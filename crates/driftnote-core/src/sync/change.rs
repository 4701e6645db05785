//! Canonical change records
//!
//! A change record is the client's full proposed state for one entity, not a
//! field delta. Both protocol revisions decode into these shapes so the
//! reconciliation algorithm exists exactly once. Identifier and timestamp
//! fields stay wire-typed strings here; they are validated up front and
//! parsed where the engine needs them.

use chrono::{DateTime, Utc};

use crate::models::RepeatType;

/// Client-proposed state for one note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteChange {
    pub id: String,
    pub title: String,
    pub body: String,
    pub is_deleted: bool,
    pub updated_at: String,
    pub is_pinned: bool,
    pub tags: String,
    pub checklist: String,
    pub color_tag: String,
}

/// Client-proposed state for one reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderChange {
    pub id: String,
    pub note_id: String,
    pub title: String,
    pub body: String,
    pub scheduled_at_epoch_millis: i64,
    pub repeat_type: RepeatType,
    pub is_enabled: bool,
    pub created_at_epoch_millis: i64,
    pub updated_at_epoch_millis: i64,
    pub is_deleted: bool,
}

/// One decoded sync request, ready for validation and reconciliation
#[derive(Debug, Clone, Default)]
pub struct SyncBatch {
    /// Cursor from the previous call; `None` requests full live state
    pub since: Option<DateTime<Utc>>,
    pub notes: Vec<NoteChange>,
    pub reminders: Vec<ReminderChange>,
}
