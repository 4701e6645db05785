//! Database layer for Driftnote
//!
//! The sync engine only ever sees the [`SyncStore`] trait; SQLite is the
//! bundled reference implementation of that boundary.

mod connection;
mod migrations;
mod store;

pub use connection::Database;
pub use store::{SqliteSyncStore, SyncStore};
