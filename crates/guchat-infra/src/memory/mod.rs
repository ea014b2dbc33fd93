//! Process-local storage.
//!
//! History kept here lives as long as the process does.

pub mod chat;
