//! Last-write-wins sync engine
//!
//! One call reconciles a client batch against server state and computes the
//! incremental pull set. The caller opens the store transaction; everything
//! in here observes and mutates a single consistent snapshot and either
//! commits or rolls back as a whole. Races between two calls on the same
//! record are serialized by the store, and the loser just sees the winner's
//! state through the ordinary conflict branches.

mod change;
mod notes;
mod reminders;

use chrono::{DateTime, Utc};

pub use change::{NoteChange, ReminderChange, SyncBatch};

use crate::db::SyncStore;
use crate::error::Result;
use crate::models::{Note, Reminder, UserId};
use crate::time;

/// Maximum server-side change records returned per entity type per call.
/// Clients drain the remainder by syncing again with the new cursor.
pub const CHANGE_PAGE_LIMIT: usize = 1000;

/// Per-record reconciliation result, folded into the outcome lists
enum Reconciliation<T> {
    /// Client state persisted; the wire ID goes into the applied list
    Applied(String),
    /// Server record is newer; returned verbatim for the client to reconcile
    Conflict(T),
    /// Ownership or referential mismatch; deliberately unreported
    Skipped,
}

/// Result of one sync call
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// Server clock snapshot taken at the start of the call; doubles as the
    /// next cursor so re-delivery is preferred over missed updates
    pub now: DateTime<Utc>,
    pub applied_notes: Vec<String>,
    pub note_conflicts: Vec<Note>,
    pub note_changes: Vec<Note>,
    pub applied_reminders: Vec<String>,
    pub reminder_conflicts: Vec<Reminder>,
    pub reminder_changes: Vec<Reminder>,
}

/// The canonical reconciliation algorithm, shared by every protocol revision
pub struct SyncEngine;

impl SyncEngine {
    /// Reconcile a validated batch inside the caller's transaction.
    pub fn sync<S: SyncStore>(store: &S, owner: UserId, batch: &SyncBatch) -> Result<SyncOutcome> {
        let now = time::now();

        let mut applied_notes = Vec::new();
        let mut note_conflicts = Vec::new();
        for change in &batch.notes {
            match notes::reconcile(store, owner, now, change)? {
                Reconciliation::Applied(id) => applied_notes.push(id),
                Reconciliation::Conflict(note) => note_conflicts.push(note),
                Reconciliation::Skipped => {}
            }
        }

        let mut applied_reminders = Vec::new();
        let mut reminder_conflicts = Vec::new();
        for change in &batch.reminders {
            match reminders::reconcile(store, owner, now, change)? {
                Reconciliation::Applied(id) => applied_reminders.push(id),
                Reconciliation::Conflict(reminder) => reminder_conflicts.push(reminder),
                Reconciliation::Skipped => {}
            }
        }

        let note_changes = store.notes_changed_since(owner, batch.since, CHANGE_PAGE_LIMIT)?;
        let reminder_changes =
            store.reminders_changed_since(owner, batch.since, CHANGE_PAGE_LIMIT)?;

        tracing::debug!(
            applied_notes = applied_notes.len(),
            note_conflicts = note_conflicts.len(),
            note_changes = note_changes.len(),
            applied_reminders = applied_reminders.len(),
            reminder_conflicts = reminder_conflicts.len(),
            reminder_changes = reminder_changes.len(),
            "Sync batch reconciled"
        );

        Ok(SyncOutcome {
            now,
            applied_notes,
            note_conflicts,
            note_changes,
            applied_reminders,
            reminder_conflicts,
            reminder_changes,
        })
    }
}
