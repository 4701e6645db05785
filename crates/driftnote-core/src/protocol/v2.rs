//! Protocol revision 2: pinned/tagged/checklisted notes plus reminders

use serde::{Deserialize, Serialize};

use crate::models::{Note, Reminder, RepeatType};
use crate::sync::{NoteChange, ReminderChange, SyncBatch, SyncOutcome};
use crate::time;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequestV2 {
    /// Cursor from the previous call; absent means first sync
    #[serde(default)]
    pub since: Option<String>,
    pub changes: Vec<NoteChangeV2>,
    #[serde(default)]
    pub reminder_changes: Vec<ReminderChangeV2>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteChangeV2 {
    pub id: String,
    pub title: String,
    pub body: String,
    pub is_deleted: bool,
    pub updated_at: String,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub checklist: String,
    #[serde(default)]
    pub color_tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderChangeV2 {
    pub id: String,
    pub note_id: String,
    pub title: String,
    pub body: String,
    pub scheduled_at_epoch_millis: i64,
    pub repeat_type: RepeatType,
    pub is_enabled: bool,
    pub created_at_epoch_millis: i64,
    pub updated_at_epoch_millis: i64,
    #[serde(default)]
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponseV2 {
    pub now: String,
    pub applied: Vec<String>,
    pub conflicts: Vec<NoteChangeV2>,
    pub changes: Vec<NoteChangeV2>,
    pub next_since: String,
    pub applied_reminders: Vec<String>,
    pub conflicts_reminders: Vec<ReminderChangeV2>,
    pub reminder_changes: Vec<ReminderChangeV2>,
}

impl SyncRequestV2 {
    /// Decode into the canonical batch; an unparseable cursor falls back to
    /// a full sync.
    pub fn into_batch(self) -> SyncBatch {
        SyncBatch {
            since: self.since.as_deref().and_then(time::parse),
            notes: self
                .changes
                .into_iter()
                .map(NoteChangeV2::into_change)
                .collect(),
            reminders: self
                .reminder_changes
                .into_iter()
                .map(ReminderChangeV2::into_change)
                .collect(),
        }
    }
}

impl NoteChangeV2 {
    fn into_change(self) -> NoteChange {
        NoteChange {
            id: self.id,
            title: self.title,
            body: self.body,
            is_deleted: self.is_deleted,
            updated_at: self.updated_at,
            is_pinned: self.is_pinned,
            tags: self.tags,
            checklist: self.checklist,
            color_tag: self.color_tag,
        }
    }

    fn from_note(note: &Note) -> Self {
        Self {
            id: note.id.as_str(),
            title: note.title.clone(),
            body: note.body.clone(),
            is_deleted: note.is_deleted,
            updated_at: time::format(&note.updated_at),
            is_pinned: note.is_pinned,
            tags: note.tags.clone(),
            checklist: note.checklist.clone(),
            color_tag: note.color_tag.clone(),
        }
    }
}

impl ReminderChangeV2 {
    fn into_change(self) -> ReminderChange {
        ReminderChange {
            id: self.id,
            note_id: self.note_id,
            title: self.title,
            body: self.body,
            scheduled_at_epoch_millis: self.scheduled_at_epoch_millis,
            repeat_type: self.repeat_type,
            is_enabled: self.is_enabled,
            created_at_epoch_millis: self.created_at_epoch_millis,
            updated_at_epoch_millis: self.updated_at_epoch_millis,
            is_deleted: self.is_deleted,
        }
    }

    fn from_reminder(reminder: &Reminder) -> Self {
        Self {
            id: reminder.id.as_str(),
            note_id: reminder.note_id.as_str(),
            title: reminder.title.clone(),
            body: reminder.body.clone(),
            scheduled_at_epoch_millis: reminder.scheduled_at_epoch_millis,
            repeat_type: reminder.repeat_type,
            is_enabled: reminder.is_enabled,
            created_at_epoch_millis: reminder.created_at_epoch_millis,
            updated_at_epoch_millis: reminder.updated_at_epoch_millis,
            is_deleted: reminder.is_deleted,
        }
    }
}

/// Encode an engine outcome for a v2 caller.
pub fn encode_response(outcome: &SyncOutcome) -> SyncResponseV2 {
    let now = time::format(&outcome.now);
    SyncResponseV2 {
        now: now.clone(),
        applied: outcome.applied_notes.clone(),
        conflicts: outcome
            .note_conflicts
            .iter()
            .map(NoteChangeV2::from_note)
            .collect(),
        changes: outcome
            .note_changes
            .iter()
            .map(NoteChangeV2::from_note)
            .collect(),
        next_since: now,
        applied_reminders: outcome.applied_reminders.clone(),
        conflicts_reminders: outcome
            .reminder_conflicts
            .iter()
            .map(ReminderChangeV2::from_reminder)
            .collect(),
        reminder_changes: outcome
            .reminder_changes
            .iter()
            .map(ReminderChangeV2::from_reminder)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{NoteId, ReminderId, UserId};

    #[test]
    fn test_decode_with_all_fields() {
        let request: SyncRequestV2 = serde_json::from_str(
            r##"{
                "since": "2024-05-01T12:00:00Z",
                "changes": [{
                    "id": "3f0c8a4e-6f4e-4f7b-9a27-0f6f3f1c2d4e",
                    "title": "t",
                    "body": "b",
                    "isDeleted": false,
                    "updatedAt": "2024-05-01T11:00:00Z",
                    "isPinned": true,
                    "tags": "a, b",
                    "checklist": "[{\"id\":\"1\",\"text\":\"x\"}]",
                    "colorTag": "#FF6B6B"
                }],
                "reminderChanges": [{
                    "id": "9a1b2c3d-4e5f-4a6b-8c7d-0e1f2a3b4c5d",
                    "noteId": "3f0c8a4e-6f4e-4f7b-9a27-0f6f3f1c2d4e",
                    "title": "r",
                    "body": "",
                    "scheduledAtEpochMillis": 1714565400000,
                    "repeatType": "WEEKLY",
                    "isEnabled": true,
                    "createdAtEpochMillis": 1714561800000,
                    "updatedAtEpochMillis": 1714561800000
                }]
            }"##,
        )
        .unwrap();

        let batch = request.into_batch();
        assert!(batch.notes[0].is_pinned);
        assert_eq!(batch.notes[0].color_tag, "#FF6B6B");
        assert_eq!(batch.reminders.len(), 1);
        assert_eq!(batch.reminders[0].repeat_type, RepeatType::Weekly);
        // isDeleted on reminders defaults to false when absent
        assert!(!batch.reminders[0].is_deleted);
    }

    #[test]
    fn test_decode_defaults_optional_note_fields() {
        let request: SyncRequestV2 = serde_json::from_str(
            r#"{
                "changes": [{
                    "id": "3f0c8a4e-6f4e-4f7b-9a27-0f6f3f1c2d4e",
                    "title": "t",
                    "body": "b",
                    "isDeleted": false,
                    "updatedAt": "2024-05-01T11:00:00Z"
                }]
            }"#,
        )
        .unwrap();

        let batch = request.into_batch();
        assert!(!batch.notes[0].is_pinned);
        assert_eq!(batch.notes[0].tags, "");
        assert_eq!(batch.notes[0].checklist, "");
        assert_eq!(batch.notes[0].color_tag, "");
    }

    #[test]
    fn test_encode_includes_reminder_triad() {
        let owner = UserId::new();
        let note_id = NoteId::new();
        let reminder = Reminder {
            id: ReminderId::new(),
            note_id,
            owner_id: owner,
            title: "r".to_string(),
            body: String::new(),
            scheduled_at_epoch_millis: 1,
            repeat_type: RepeatType::Daily,
            is_enabled: true,
            is_deleted: false,
            created_at_epoch_millis: 1,
            updated_at_epoch_millis: 1,
            updated_at: time::now(),
        };
        let outcome = SyncOutcome {
            now: time::now(),
            applied_notes: vec![],
            note_conflicts: vec![],
            note_changes: vec![],
            applied_reminders: vec![reminder.id.as_str()],
            reminder_conflicts: vec![],
            reminder_changes: vec![reminder],
        };

        let json = serde_json::to_value(encode_response(&outcome)).unwrap();
        assert_eq!(json["appliedReminders"].as_array().unwrap().len(), 1);
        assert_eq!(json["reminderChanges"][0]["repeatType"], "DAILY");
        assert_eq!(json["reminderChanges"][0]["noteId"], note_id.as_str());
    }

    #[test]
    fn test_note_wire_shape_round_trips() {
        let change = NoteChangeV2 {
            id: NoteId::new().as_str(),
            title: "t".to_string(),
            body: "b".to_string(),
            is_deleted: true,
            updated_at: "2024-05-01T11:00:00Z".to_string(),
            is_pinned: true,
            tags: "a".to_string(),
            checklist: String::new(),
            color_tag: "#000000".to_string(),
        };
        let json = serde_json::to_string(&change).unwrap();
        assert!(json.contains("\"isDeleted\":true"));
        assert!(json.contains("\"colorTag\""));
        let back: NoteChangeV2 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, change);
    }
}
