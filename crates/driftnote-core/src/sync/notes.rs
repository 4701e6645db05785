//! Note reconciliation

use chrono::{DateTime, Utc};

use crate::db::SyncStore;
use crate::error::Result;
use crate::models::{Note, NoteId, UserId};
use crate::time;

use super::{NoteChange, Reconciliation};

/// Reconcile one client note change against the store.
///
/// Insert and update are branches of a single upsert keyed on the
/// client-assigned ID. The stored `updated_at` always becomes the server
/// instant; the client's claimed instant only participates in the
/// comparison. Equal timestamps favor the client - a true concurrent edit
/// at identical wall-clock resolution is decided arbitrarily, an accepted
/// protocol limitation.
pub(super) fn reconcile<S: SyncStore>(
    store: &S,
    owner: UserId,
    now: DateTime<Utc>,
    change: &NoteChange,
) -> Result<Reconciliation<Note>> {
    let Ok(id) = change.id.parse::<NoteId>() else {
        return Ok(Reconciliation::Skipped);
    };
    let Some(client_updated_at) = time::parse(&change.updated_at) else {
        return Ok(Reconciliation::Skipped);
    };

    let Some(existing) = store.find_note(id)? else {
        store.insert_note(&from_change(id, owner, now, change))?;
        return Ok(Reconciliation::Applied(change.id.clone()));
    };

    // A client cannot touch another owner's record by guessing its ID;
    // skipping silently avoids leaking that the record exists.
    if existing.owner_id != owner {
        return Ok(Reconciliation::Skipped);
    }

    if existing.updated_at > client_updated_at {
        return Ok(Reconciliation::Conflict(existing));
    }

    store.update_note(&from_change(id, existing.owner_id, now, change))?;
    Ok(Reconciliation::Applied(change.id.clone()))
}

fn from_change(id: NoteId, owner: UserId, now: DateTime<Utc>, change: &NoteChange) -> Note {
    Note {
        id,
        owner_id: owner,
        title: change.title.clone(),
        body: change.body.clone(),
        is_deleted: change.is_deleted,
        updated_at: now,
        is_pinned: change.is_pinned,
        tags: change.tags.clone(),
        checklist: change.checklist.clone(),
        color_tag: change.color_tag.clone(),
    }
}
