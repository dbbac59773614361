//! Slot-backed collections of notes and tags.
//!
//! Each registry owns one [`LocalSlot`](crate::slot::LocalSlot). Mutations
//! never edit the current collection in place: they build a new one and
//! hand it to the slot, which persists it in full.

mod notes;
mod tags;

pub use notes::{NOTES_KEY, NoteRegistry};
pub use tags::{TAGS_KEY, TagRegistry};
