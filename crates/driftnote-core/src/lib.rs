//! driftnote-core - Core library for the Driftnote sync backend
//!
//! This crate contains the data models, the record store adapter, the
//! change-set validator, the last-write-wins sync engine, and the wire
//! protocol translation layer. HTTP transport lives in driftnote-api.

pub mod db;
pub mod error;
pub mod models;
pub mod protocol;
pub mod sync;
pub mod time;
pub mod validation;

pub use error::{Error, Result};
pub use models::{Note, NoteId, Reminder, ReminderId, RepeatType, UserId};
