//! Change-set validation
//!
//! A sync request is rejected outright when any contained change record is
//! structurally invalid; nothing from the batch reaches the store. Ownership
//! and referential checks are business logic in the engine, not validation.

use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::sync::{NoteChange, ReminderChange, SyncBatch};
use crate::time;

const MAX_TITLE_CHARS: usize = 500;
const MAX_BODY_CHARS: usize = 10_000;
const MAX_TAGS: usize = 50;
const MAX_TAG_CHARS: usize = 30;
const MAX_CHECKLIST_TEXT_CHARS: usize = 200;

/// Validate every change record in a batch, failing on the first violation.
pub fn validate_batch(batch: &SyncBatch) -> Result<()> {
    for change in &batch.notes {
        validate_note_change(change)?;
    }
    for change in &batch.reminders {
        validate_reminder_change(change)?;
    }
    Ok(())
}

fn validate_note_change(change: &NoteChange) -> Result<()> {
    if uuid::Uuid::parse_str(&change.id).is_err() {
        return Err(Error::validation(format!(
            "Invalid note ID format: {}",
            change.id
        )));
    }

    if change.title.chars().count() > MAX_TITLE_CHARS {
        return Err(Error::validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_CHARS} characters"
        )));
    }

    if change.body.chars().count() > MAX_BODY_CHARS {
        return Err(Error::validation(format!(
            "Body exceeds maximum length of {MAX_BODY_CHARS} characters"
        )));
    }

    if !change.tags.is_empty() {
        let tags: Vec<&str> = change.tags.split(',').map(str::trim).collect();
        if tags.len() > MAX_TAGS {
            return Err(Error::validation(format!("Maximum {MAX_TAGS} tags allowed")));
        }
        for tag in tags {
            if tag.chars().count() > MAX_TAG_CHARS {
                return Err(Error::validation(format!(
                    "Tag exceeds maximum length of {MAX_TAG_CHARS} characters: {tag}"
                )));
            }
        }
    }

    let checklist = change.checklist.trim();
    if !checklist.is_empty() {
        validate_checklist(checklist)?;
    }

    if !change.color_tag.is_empty() && !is_hex_color(&change.color_tag) {
        return Err(Error::validation(
            "Invalid colorTag format. Must be hex color (e.g., #FF6B6B)",
        ));
    }

    if time::parse(&change.updated_at).is_none() {
        return Err(Error::validation(format!(
            "Invalid updatedAt timestamp format: {}",
            change.updated_at
        )));
    }

    Ok(())
}

/// A checklist is stored as a JSON-array-shaped string of
/// `{id, text, checked?}` items; `checked` defaults to false when absent.
fn validate_checklist(raw: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(raw)
        .map_err(|e| Error::validation(format!("Invalid checklist format: {e}")))?;

    let Value::Array(items) = parsed else {
        return Err(Error::validation("Checklist must be a JSON array"));
    };

    for (index, item) in items.iter().enumerate() {
        let Value::Object(fields) = item else {
            return Err(Error::validation(format!(
                "Checklist item at index {index} must be a JSON object"
            )));
        };

        let mut missing = Vec::new();
        if !fields.contains_key("id") {
            missing.push("id");
        }
        if !fields.contains_key("text") {
            missing.push("text");
        }
        if !missing.is_empty() {
            let found: Vec<&str> = fields.keys().map(String::as_str).collect();
            return Err(Error::validation(format!(
                "Invalid checklist item at index {index}: missing required fields {}. Found keys: {}",
                missing.join(", "),
                found.join(", ")
            )));
        }

        let text_len = fields
            .get("text")
            .and_then(Value::as_str)
            .map_or(0, |text| text.chars().count());
        if text_len > MAX_CHECKLIST_TEXT_CHARS {
            return Err(Error::validation(format!(
                "Checklist item text at index {index} exceeds maximum length of {MAX_CHECKLIST_TEXT_CHARS} characters"
            )));
        }
    }

    Ok(())
}

fn validate_reminder_change(change: &ReminderChange) -> Result<()> {
    if uuid::Uuid::parse_str(&change.id).is_err() {
        return Err(Error::validation(format!(
            "Invalid reminder ID format: {}",
            change.id
        )));
    }

    if uuid::Uuid::parse_str(&change.note_id).is_err() {
        return Err(Error::validation(format!(
            "Invalid reminder note ID format: {}",
            change.note_id
        )));
    }

    if change.title.chars().count() > MAX_TITLE_CHARS {
        return Err(Error::validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_CHARS} characters"
        )));
    }

    if change.body.chars().count() > MAX_BODY_CHARS {
        return Err(Error::validation(format!(
            "Body exceeds maximum length of {MAX_BODY_CHARS} characters"
        )));
    }

    Ok(())
}

fn is_hex_color(value: &str) -> bool {
    let re = Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid regex");
    re.is_match(value)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::RepeatType;

    fn note_change() -> NoteChange {
        NoteChange {
            id: uuid::Uuid::new_v4().to_string(),
            title: "Groceries".to_string(),
            body: "milk, eggs".to_string(),
            is_deleted: false,
            updated_at: "2024-05-01T12:30:00Z".to_string(),
            is_pinned: false,
            tags: String::new(),
            checklist: String::new(),
            color_tag: String::new(),
        }
    }

    fn reminder_change() -> ReminderChange {
        ReminderChange {
            id: uuid::Uuid::new_v4().to_string(),
            note_id: uuid::Uuid::new_v4().to_string(),
            title: "Buy milk".to_string(),
            body: String::new(),
            scheduled_at_epoch_millis: 1_714_565_400_000,
            repeat_type: RepeatType::None,
            is_enabled: true,
            created_at_epoch_millis: 1_714_561_800_000,
            updated_at_epoch_millis: 1_714_561_800_000,
            is_deleted: false,
        }
    }

    fn batch_of(notes: Vec<NoteChange>, reminders: Vec<ReminderChange>) -> SyncBatch {
        SyncBatch {
            since: None,
            notes,
            reminders,
        }
    }

    #[test]
    fn test_valid_batch_passes() {
        let mut change = note_change();
        change.tags = "shopping, weekly".to_string();
        change.checklist = r#"[{"id":"1","text":"milk","checked":true},{"id":"2","text":"eggs"}]"#
            .to_string();
        change.color_tag = "#FF6B6B".to_string();
        assert!(validate_batch(&batch_of(vec![change], vec![reminder_change()])).is_ok());
    }

    #[test]
    fn test_rejects_malformed_note_id() {
        let mut change = note_change();
        change.id = "definitely-not-a-uuid".to_string();
        let err = validate_batch(&batch_of(vec![change], vec![])).unwrap_err();
        assert!(err.to_string().contains("Invalid note ID format"));
    }

    #[test]
    fn test_rejects_oversize_title() {
        let mut change = note_change();
        change.title = "x".repeat(501);
        let err = validate_batch(&batch_of(vec![change], vec![])).unwrap_err();
        assert!(err.to_string().contains("Title exceeds maximum length"));
    }

    #[test]
    fn test_accepts_title_at_limit() {
        let mut change = note_change();
        change.title = "x".repeat(500);
        assert!(validate_batch(&batch_of(vec![change], vec![])).is_ok());
    }

    #[test]
    fn test_rejects_oversize_body() {
        let mut change = note_change();
        change.body = "x".repeat(10_001);
        let err = validate_batch(&batch_of(vec![change], vec![])).unwrap_err();
        assert!(err.to_string().contains("Body exceeds maximum length"));
    }

    #[test]
    fn test_rejects_too_many_tags() {
        let mut change = note_change();
        change.tags = vec!["tag"; 51].join(",");
        let err = validate_batch(&batch_of(vec![change], vec![])).unwrap_err();
        assert!(err.to_string().contains("Maximum 50 tags allowed"));
    }

    #[test]
    fn test_rejects_oversize_tag_after_trim() {
        let mut change = note_change();
        change.tags = format!("ok, {}", "y".repeat(31));
        let err = validate_batch(&batch_of(vec![change], vec![])).unwrap_err();
        assert!(err.to_string().contains("Tag exceeds maximum length"));
    }

    #[test]
    fn test_rejects_checklist_that_is_not_an_array() {
        let mut change = note_change();
        change.checklist = r#"{"id":"1","text":"milk"}"#.to_string();
        let err = validate_batch(&batch_of(vec![change], vec![])).unwrap_err();
        assert!(err.to_string().contains("Checklist must be a JSON array"));
    }

    #[test]
    fn test_rejects_checklist_item_missing_keys() {
        let mut change = note_change();
        change.checklist = r#"[{"id":"1","text":"milk"},{"label":"eggs"}]"#.to_string();
        let err = validate_batch(&batch_of(vec![change], vec![])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("index 1"));
        assert!(message.contains("id, text"));
    }

    #[test]
    fn test_rejects_non_object_checklist_item() {
        let mut change = note_change();
        change.checklist = r#"["milk"]"#.to_string();
        let err = validate_batch(&batch_of(vec![change], vec![])).unwrap_err();
        assert!(err.to_string().contains("must be a JSON object"));
    }

    #[test]
    fn test_rejects_oversize_checklist_text() {
        let mut change = note_change();
        change.checklist = format!(r#"[{{"id":"1","text":"{}"}}]"#, "z".repeat(201));
        let err = validate_batch(&batch_of(vec![change], vec![])).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum length of 200"));
    }

    #[test]
    fn test_checked_key_is_optional() {
        let mut change = note_change();
        change.checklist = r#"[{"id":"1","text":"milk"}]"#.to_string();
        assert!(validate_batch(&batch_of(vec![change], vec![])).is_ok());
    }

    #[test]
    fn test_rejects_bad_color_tag() {
        for bad in ["FF6B6B", "#FF6B6", "#FF6B6BB", "#GG6B6B", "red"] {
            let mut change = note_change();
            change.color_tag = bad.to_string();
            let err = validate_batch(&batch_of(vec![change], vec![])).unwrap_err();
            assert!(err.to_string().contains("Invalid colorTag format"), "{bad}");
        }
    }

    #[test]
    fn test_rejects_bad_updated_at() {
        let mut change = note_change();
        change.updated_at = "yesterday".to_string();
        let err = validate_batch(&batch_of(vec![change], vec![])).unwrap_err();
        assert!(err.to_string().contains("Invalid updatedAt timestamp"));
    }

    #[test]
    fn test_rejects_malformed_reminder_ids() {
        let mut change = reminder_change();
        change.note_id = "nope".to_string();
        let err = validate_batch(&batch_of(vec![], vec![change])).unwrap_err();
        assert!(err.to_string().contains("Invalid reminder note ID format"));
    }

    #[test]
    fn test_one_bad_record_rejects_whole_batch() {
        let mut bad = note_change();
        bad.title = "x".repeat(501);
        let changes = vec![note_change(), note_change(), note_change(), bad];
        let result = validate_batch(&batch_of(changes, vec![]));
        assert!(result.is_err());
    }
}
