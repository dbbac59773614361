use std::collections::HashSet;

use crate::slot::LocalSlot;
use crate::storage::{Storage, StorageError};
use crate::{NoteData, NoteId, RawNote, TagId};

/// Storage key holding the serialized note collection.
pub const NOTES_KEY: &str = "NOTES";

/// The flat collection of persisted notes.
#[derive(Debug)]
pub struct NoteRegistry {
    slot: LocalSlot<Vec<RawNote>>,
}

impl NoteRegistry {
    /// Loads the registry from the `NOTES` slot, empty if absent or corrupt.
    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        Self {
            slot: LocalSlot::load(storage, NOTES_KEY, Vec::new()),
        }
    }

    /// Returns all notes in insertion order.
    pub fn all(&self) -> &[RawNote] {
        self.slot.get()
    }

    /// Returns the collection version; bumps on every replacement.
    pub fn version(&self) -> u64 {
        self.slot.version()
    }

    pub fn len(&self) -> usize {
        self.all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.all().is_empty()
    }

    /// Looks up a note by id.
    pub fn get(&self, id: &NoteId) -> Option<&RawNote> {
        self.all().iter().find(|note| note.id() == id)
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.get(id).is_some()
    }

    /// Appends a new note with the given id.
    ///
    /// Returns `Ok(false)` without writing when a note with the same id
    /// already exists.
    pub fn create<S: Storage + ?Sized>(
        &mut self,
        storage: &S,
        id: NoteId,
        data: &NoteData,
    ) -> Result<bool, StorageError> {
        if self.contains(&id) {
            return Ok(false);
        }

        let mut next = self.all().to_vec();
        next.push(RawNote::from_data(id, data));
        self.slot.set(storage, next)?;
        Ok(true)
    }

    /// Replaces title, body and tag references of the note with `id`.
    ///
    /// Returns `Ok(false)` without writing when no such note exists.
    pub fn update<S: Storage + ?Sized>(
        &mut self,
        storage: &S,
        id: &NoteId,
        data: &NoteData,
    ) -> Result<bool, StorageError> {
        if !self.contains(id) {
            return Ok(false);
        }

        let next = self
            .all()
            .iter()
            .map(|note| {
                if note.id() == id {
                    note.updated(data)
                } else {
                    note.clone()
                }
            })
            .collect();
        self.slot.set(storage, next)?;
        Ok(true)
    }

    /// Removes the note with `id`.
    ///
    /// Returns `Ok(false)` without writing when no such note exists.
    pub fn delete<S: Storage + ?Sized>(
        &mut self,
        storage: &S,
        id: &NoteId,
    ) -> Result<bool, StorageError> {
        if !self.contains(id) {
            return Ok(false);
        }

        let next = self
            .all()
            .iter()
            .filter(|note| note.id() != id)
            .cloned()
            .collect();
        self.slot.set(storage, next)?;
        Ok(true)
    }

    /// Drops every tag reference not contained in `existing`.
    ///
    /// Returns the number of references removed. Writes only when at least
    /// one reference was dropped.
    pub fn prune_tag_ids<S: Storage + ?Sized>(
        &mut self,
        storage: &S,
        existing: &HashSet<&TagId>,
    ) -> Result<usize, StorageError> {
        let mut removed = 0;
        let next: Vec<RawNote> = self
            .all()
            .iter()
            .map(|note| {
                note.retain_tag_ids(|id| {
                    let keep = existing.contains(id);
                    if !keep {
                        removed += 1;
                    }
                    keep
                })
            })
            .collect();

        if removed > 0 {
            self.slot.set(storage, next)?;
        }
        Ok(removed)
    }
}
