//! Protocol revision 1: notes only, no pin/tags/checklist/color

use serde::{Deserialize, Serialize};

use crate::models::Note;
use crate::sync::{NoteChange, SyncBatch, SyncOutcome};
use crate::time;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequestV1 {
    /// Cursor from the previous call; absent means first sync
    #[serde(default)]
    pub since: Option<String>,
    pub changes: Vec<NoteChangeV1>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteChangeV1 {
    pub id: String,
    pub title: String,
    pub body: String,
    pub is_deleted: bool,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponseV1 {
    pub now: String,
    pub applied: Vec<String>,
    pub conflicts: Vec<NoteChangeV1>,
    pub changes: Vec<NoteChangeV1>,
    pub next_since: String,
}

impl SyncRequestV1 {
    /// Decode into the canonical batch. Fields this revision predates take
    /// their empty defaults; an unparseable cursor falls back to a full sync.
    pub fn into_batch(self) -> SyncBatch {
        SyncBatch {
            since: self.since.as_deref().and_then(time::parse),
            notes: self
                .changes
                .into_iter()
                .map(NoteChangeV1::into_change)
                .collect(),
            reminders: vec![],
        }
    }
}

impl NoteChangeV1 {
    fn into_change(self) -> NoteChange {
        NoteChange {
            id: self.id,
            title: self.title,
            body: self.body,
            is_deleted: self.is_deleted,
            updated_at: self.updated_at,
            is_pinned: false,
            tags: String::new(),
            checklist: String::new(),
            color_tag: String::new(),
        }
    }

    fn from_note(note: &Note) -> Self {
        Self {
            id: note.id.as_str(),
            title: note.title.clone(),
            body: note.body.clone(),
            is_deleted: note.is_deleted,
            updated_at: time::format(&note.updated_at),
        }
    }
}

/// Encode an engine outcome for a v1 caller, dropping everything the
/// revision does not know about (including the whole reminder triad).
pub fn encode_response(outcome: &SyncOutcome) -> SyncResponseV1 {
    let now = time::format(&outcome.now);
    SyncResponseV1 {
        now: now.clone(),
        applied: outcome.applied_notes.clone(),
        conflicts: outcome
            .note_conflicts
            .iter()
            .map(NoteChangeV1::from_note)
            .collect(),
        changes: outcome
            .note_changes
            .iter()
            .map(NoteChangeV1::from_note)
            .collect(),
        next_since: now,
    }
}
