//! Record store adapter
//!
//! [`SyncStore`] is the boundary the reconciliation engine depends on:
//! find-by-ID, insert, update, and the owner-scoped changed-since query for
//! each entity type. Isolation comes from the surrounding transaction, never
//! from the engine.

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::Result;
use crate::models::{Note, NoteId, Reminder, ReminderId, UserId};
use crate::time;

/// Trait for the transactional record store a sync call runs against
pub trait SyncStore {
    /// Look up a note by ID, regardless of owner or tombstone state
    fn find_note(&self, id: NoteId) -> Result<Option<Note>>;

    /// Insert a new note
    fn insert_note(&self, note: &Note) -> Result<()>;

    /// Overwrite an existing note
    fn update_note(&self, note: &Note) -> Result<()>;

    /// Live (non-deleted) notes of `owner` modified after `since`,
    /// ascending by `updated_at`, capped at `limit`
    fn notes_changed_since(
        &self,
        owner: UserId,
        since: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<Note>>;

    /// Look up a reminder by ID, regardless of owner or tombstone state
    fn find_reminder(&self, id: ReminderId) -> Result<Option<Reminder>>;

    /// Insert a new reminder
    fn insert_reminder(&self, reminder: &Reminder) -> Result<()>;

    /// Overwrite an existing reminder
    fn update_reminder(&self, reminder: &Reminder) -> Result<()>;

    /// Live (non-deleted) reminders of `owner` modified after `since`,
    /// ascending by server `updated_at`, capped at `limit`
    fn reminders_changed_since(
        &self,
        owner: UserId,
        since: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<Reminder>>;
}

/// `SQLite` implementation of [`SyncStore`]
///
/// Works over a plain connection or a `rusqlite::Transaction` (which derefs
/// to one); the sync handler always hands it a transaction.
pub struct SqliteSyncStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSyncStore<'a> {
    /// Create a new store adapter with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a note from a database row
    fn parse_note(row: &rusqlite::Row<'_>) -> rusqlite::Result<Note> {
        let id: String = row.get(0)?;
        let owner_id: String = row.get(1)?;
        Ok(Note {
            id: id.parse().unwrap_or_default(),
            owner_id: owner_id.parse().unwrap_or_default(),
            title: row.get(2)?,
            body: row.get(3)?,
            is_deleted: row.get::<_, i32>(4)? != 0,
            updated_at: time::from_epoch_micros(row.get(5)?).unwrap_or_default(),
            is_pinned: row.get::<_, i32>(6)? != 0,
            tags: row.get(7)?,
            checklist: row.get(8)?,
            color_tag: row.get(9)?,
        })
    }

    /// Parse a reminder from a database row
    fn parse_reminder(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reminder> {
        let id: String = row.get(0)?;
        let note_id: String = row.get(1)?;
        let owner_id: String = row.get(2)?;
        let repeat_type: String = row.get(6)?;
        Ok(Reminder {
            id: id.parse().unwrap_or_default(),
            note_id: note_id.parse().unwrap_or_default(),
            owner_id: owner_id.parse().unwrap_or_default(),
            title: row.get(3)?,
            body: row.get(4)?,
            scheduled_at_epoch_millis: row.get(5)?,
            repeat_type: repeat_type.parse().unwrap_or_default(),
            is_enabled: row.get::<_, i32>(7)? != 0,
            is_deleted: row.get::<_, i32>(8)? != 0,
            created_at_epoch_millis: row.get(9)?,
            updated_at_epoch_millis: row.get(10)?,
            updated_at: time::from_epoch_micros(row.get(11)?).unwrap_or_default(),
        })
    }
}

const NOTE_COLUMNS: &str = "id, owner_id, title, body, is_deleted, updated_at,
     is_pinned, tags, checklist, color_tag";

const REMINDER_COLUMNS: &str = "id, note_id, owner_id, title, body,
     scheduled_at_epoch_millis, repeat_type, is_enabled, is_deleted,
     created_at_epoch_millis, updated_at_epoch_millis, updated_at";

impl SyncStore for SqliteSyncStore<'_> {
    fn find_note(&self, id: NoteId) -> Result<Option<Note>> {
        let result = self.conn.query_row(
            &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?"),
            params![id.as_str()],
            Self::parse_note,
        );

        match result {
            Ok(note) => Ok(Some(note)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn insert_note(&self, note: &Note) -> Result<()> {
        self.conn.execute(
            "INSERT INTO notes (id, owner_id, title, body, is_deleted, updated_at,
             is_pinned, tags, checklist, color_tag)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                note.id.as_str(),
                note.owner_id.as_str(),
                note.title,
                note.body,
                i32::from(note.is_deleted),
                note.updated_at.timestamp_micros(),
                i32::from(note.is_pinned),
                note.tags,
                note.checklist,
                note.color_tag,
            ],
        )?;
        Ok(())
    }

    fn update_note(&self, note: &Note) -> Result<()> {
        self.conn.execute(
            "UPDATE notes SET title = ?, body = ?, is_deleted = ?, updated_at = ?,
             is_pinned = ?, tags = ?, checklist = ?, color_tag = ?
             WHERE id = ?",
            params![
                note.title,
                note.body,
                i32::from(note.is_deleted),
                note.updated_at.timestamp_micros(),
                i32::from(note.is_pinned),
                note.tags,
                note.checklist,
                note.color_tag,
                note.id.as_str(),
            ],
        )?;
        Ok(())
    }

    fn notes_changed_since(
        &self,
        owner: UserId,
        since: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes
             WHERE owner_id = ? AND is_deleted = 0 AND updated_at > ?
             ORDER BY updated_at ASC
             LIMIT ?"
        ))?;

        let floor = since.map_or(i64::MIN, |instant| instant.timestamp_micros());
        let notes = stmt
            .query_map(
                params![owner.as_str(), floor, limit as i64],
                Self::parse_note,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(notes)
    }

    fn find_reminder(&self, id: ReminderId) -> Result<Option<Reminder>> {
        let result = self.conn.query_row(
            &format!("SELECT {REMINDER_COLUMNS} FROM reminders WHERE id = ?"),
            params![id.as_str()],
            Self::parse_reminder,
        );

        match result {
            Ok(reminder) => Ok(Some(reminder)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn insert_reminder(&self, reminder: &Reminder) -> Result<()> {
        self.conn.execute(
            "INSERT INTO reminders (id, note_id, owner_id, title, body,
             scheduled_at_epoch_millis, repeat_type, is_enabled, is_deleted,
             created_at_epoch_millis, updated_at_epoch_millis, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                reminder.id.as_str(),
                reminder.note_id.as_str(),
                reminder.owner_id.as_str(),
                reminder.title,
                reminder.body,
                reminder.scheduled_at_epoch_millis,
                reminder.repeat_type.as_str(),
                i32::from(reminder.is_enabled),
                i32::from(reminder.is_deleted),
                reminder.created_at_epoch_millis,
                reminder.updated_at_epoch_millis,
                reminder.updated_at.timestamp_micros(),
            ],
        )?;
        Ok(())
    }

    fn update_reminder(&self, reminder: &Reminder) -> Result<()> {
        // note_id and created_at_epoch_millis are fixed at creation
        self.conn.execute(
            "UPDATE reminders SET title = ?, body = ?, scheduled_at_epoch_millis = ?,
             repeat_type = ?, is_enabled = ?, is_deleted = ?,
             updated_at_epoch_millis = ?, updated_at = ?
             WHERE id = ?",
            params![
                reminder.title,
                reminder.body,
                reminder.scheduled_at_epoch_millis,
                reminder.repeat_type.as_str(),
                i32::from(reminder.is_enabled),
                i32::from(reminder.is_deleted),
                reminder.updated_at_epoch_millis,
                reminder.updated_at.timestamp_micros(),
                reminder.id.as_str(),
            ],
        )?;
        Ok(())
    }

    fn reminders_changed_since(
        &self,
        owner: UserId,
        since: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<Reminder>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders
             WHERE owner_id = ? AND is_deleted = 0 AND updated_at > ?
             ORDER BY updated_at ASC
             LIMIT ?"
        ))?;

        let floor = since.map_or(i64::MIN, |instant| instant.timestamp_micros());
        let reminders = stmt
            .query_map(
                params![owner.as_str(), floor, limit as i64],
                Self::parse_reminder,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(reminders)
    }
}
