//! Reminder reconciliation
//!
//! Same last-write-wins shape as notes, with two differences: the parent
//! note must exist and share the owner before anything is written, and the
//! comparison runs on the client epoch-millis timestamps rather than parsed
//! instants. The server-side `updated_at` is refreshed on every mutation so
//! the changed-since query stays in lockstep.

use chrono::{DateTime, Utc};

use crate::db::SyncStore;
use crate::error::Result;
use crate::models::{NoteId, Reminder, ReminderId, UserId};

use super::{Reconciliation, ReminderChange};

pub(super) fn reconcile<S: SyncStore>(
    store: &S,
    owner: UserId,
    now: DateTime<Utc>,
    change: &ReminderChange,
) -> Result<Reconciliation<Reminder>> {
    let Ok(id) = change.id.parse::<ReminderId>() else {
        return Ok(Reconciliation::Skipped);
    };
    let Ok(note_id) = change.note_id.parse::<NoteId>() else {
        return Ok(Reconciliation::Skipped);
    };

    // Referential invariant: orphaned or foreign-note reminders are skipped
    // without being reported, same rationale as ownership mismatches.
    match store.find_note(note_id)? {
        Some(note) if note.owner_id == owner => {}
        _ => return Ok(Reconciliation::Skipped),
    }

    let Some(existing) = store.find_reminder(id)? else {
        store.insert_reminder(&Reminder {
            id,
            note_id,
            owner_id: owner,
            title: change.title.clone(),
            body: change.body.clone(),
            scheduled_at_epoch_millis: change.scheduled_at_epoch_millis,
            repeat_type: change.repeat_type,
            is_enabled: change.is_enabled,
            is_deleted: change.is_deleted,
            created_at_epoch_millis: change.created_at_epoch_millis,
            updated_at_epoch_millis: change.updated_at_epoch_millis,
            updated_at: now,
        })?;
        return Ok(Reconciliation::Applied(change.id.clone()));
    };

    if existing.owner_id != owner {
        return Ok(Reconciliation::Skipped);
    }

    if existing.updated_at_epoch_millis > change.updated_at_epoch_millis {
        return Ok(Reconciliation::Conflict(existing));
    }

    // Client wins; the parent binding and creation instant stay as stored.
    store.update_reminder(&Reminder {
        id,
        note_id: existing.note_id,
        owner_id: existing.owner_id,
        title: change.title.clone(),
        body: change.body.clone(),
        scheduled_at_epoch_millis: change.scheduled_at_epoch_millis,
        repeat_type: change.repeat_type,
        is_enabled: change.is_enabled,
        is_deleted: change.is_deleted,
        created_at_epoch_millis: existing.created_at_epoch_millis,
        updated_at_epoch_millis: change.updated_at_epoch_millis,
        updated_at: now,
    })?;
    Ok(Reconciliation::Applied(change.id.clone()))
}
