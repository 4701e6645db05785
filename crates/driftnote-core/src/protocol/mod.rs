//! Wire protocol translation
//!
//! Two request surfaces coexist against the same records: v1 predates pins,
//! tags, checklists, colors, and reminders; v2 carries all of them. Each
//! revision decodes into the canonical [`crate::sync::SyncBatch`] and encodes
//! canonical store state back into its own shape, so persistence and
//! reconciliation stay version-agnostic.

pub mod v1;
pub mod v2;
