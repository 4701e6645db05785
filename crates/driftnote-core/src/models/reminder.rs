//! Reminder model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{NoteId, UserId};

/// A unique identifier for a reminder, client-assigned like note IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReminderId(Uuid);

impl ReminderId {
    /// Create a new random reminder ID
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

impl Default for ReminderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReminderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Repeat policy for a reminder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RepeatType {
    #[default]
    None,
    Daily,
    Weekly,
}

impl RepeatType {
    /// Stable name used in the store
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
        }
    }
}

impl FromStr for RepeatType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(Self::None),
            "DAILY" => Ok(Self::Daily),
            "WEEKLY" => Ok(Self::Weekly),
            other => Err(format!("Unknown repeat type: {other}")),
        }
    }
}

/// A stored reminder, bound to a note with the same owner.
///
/// Client devices compare reminders by the epoch-millis timestamps they set
/// themselves; `updated_at` is a separate server instant that only drives
/// the changed-since query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Unique identifier, client-assigned at creation
    pub id: ReminderId,
    /// Parent note; set at creation and never re-parented
    pub note_id: NoteId,
    /// Owning user
    pub owner_id: UserId,
    /// Reminder title
    pub title: String,
    /// Reminder body
    pub body: String,
    /// Scheduled trigger instant, client epoch millis
    pub scheduled_at_epoch_millis: i64,
    /// Repeat policy
    pub repeat_type: RepeatType,
    /// Whether the reminder fires
    pub is_enabled: bool,
    /// Tombstone flag
    pub is_deleted: bool,
    /// Client creation instant, epoch millis
    pub created_at_epoch_millis: i64,
    /// Client last-modified instant, epoch millis; drives conflict resolution
    pub updated_at_epoch_millis: i64,
    /// Server instant of the last mutation; drives the changed-since query
    pub updated_at: DateTime<Utc>,
}
