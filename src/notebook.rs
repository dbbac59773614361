use std::collections::HashSet;

use thiserror::Error;

use crate::ids::{IdGenerator, UuidIds};
use crate::join::{JoinView, resolve_note};
use crate::registry::{NoteRegistry, TagRegistry};
use crate::storage::{Storage, StorageError};
use crate::{Note, NoteData, NoteId, RawNote, Tag, TagId};

/// Errors returned by [`Notebook`] operations.
///
/// Only persistence can fail; lookups that find nothing are reported as
/// `Ok(false)` by the operation itself.
#[derive(Debug, Error)]
pub enum NotebookError {
    /// The in-memory state changed but could not be written to storage
    #[error("failed to persist changes: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T, E = NotebookError> = std::result::Result<T, E>;

/// Criteria for narrowing the note list.
///
/// A note matches when its title contains `title` (case-insensitive; empty
/// matches everything) and every id in `tag_ids` is among its resolved tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    pub title: String,
    pub tag_ids: Vec<TagId>,
}

impl NoteFilter {
    /// Returns true when `note` satisfies the filter.
    pub fn matches(&self, note: &Note) -> bool {
        let title_matches = self.title.is_empty()
            || note
                .title
                .to_lowercase()
                .contains(&self.title.to_lowercase());

        title_matches && self.tag_ids.iter().all(|id| note.has_tag(id))
    }
}

/// Notes, tags and the join between them, kept in one storage backend.
///
/// The notebook is the single writer of the `NOTES` and `TAGS` slots. Every
/// successful mutation writes the affected collection once, in full.
///
/// # Examples
///
/// ```
/// use marknote::{MemoryStorage, NoteData, Notebook};
///
/// # fn main() -> Result<(), marknote::NotebookError> {
/// let mut notebook = Notebook::open(MemoryStorage::new());
///
/// let work = notebook.create_tag("work")?;
/// let id = notebook.create_note(NoteData::new("Standup", "notes").with_tags(vec![work]))?;
///
/// let note = notebook.note(&id).expect("note exists");
/// assert_eq!(note.tags[0].label(), "work");
/// # Ok(())
/// # }
/// ```
pub struct Notebook<S, G = UuidIds> {
    storage: S,
    notes: NoteRegistry,
    tags: TagRegistry,
    view: JoinView,
    ids: G,
}

impl<S: Storage> Notebook<S> {
    /// Loads both collections from `storage`, minting UUID v4 ids.
    pub fn open(storage: S) -> Self {
        Self::with_id_generator(storage, UuidIds)
    }
}

impl<S: Storage, G: IdGenerator> Notebook<S, G> {
    /// Loads both collections from `storage` using the given id source.
    ///
    /// Absent or corrupt slots load as empty collections.
    pub fn with_id_generator(storage: S, ids: G) -> Self {
        let notes = NoteRegistry::load(&storage);
        let tags = TagRegistry::load(&storage);
        log::debug!("opened notebook: {} notes, {} tags", notes.len(), tags.len());

        Self {
            storage,
            notes,
            tags,
            view: JoinView::new(),
            ids,
        }
    }

    /// Returns the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consumes the notebook, returning its storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Returns the persisted notes with unresolved tag ids.
    pub fn raw_notes(&self) -> &[RawNote] {
        self.notes.all()
    }

    /// Returns every tag.
    pub fn tags(&self) -> &[Tag] {
        self.tags.all()
    }

    /// Looks up a tag by id.
    pub fn tag(&self, id: &TagId) -> Option<&Tag> {
        self.tags.get(id)
    }

    /// Looks up a tag by label, ignoring case.
    pub fn tag_by_label(&self, label: &str) -> Option<&Tag> {
        self.tags.find_by_label(label)
    }

    /// Returns every note with its tags resolved.
    ///
    /// The result is cached until either collection changes.
    pub fn notes(&mut self) -> &[Note] {
        self.view.notes(&self.notes, &self.tags)
    }

    /// Returns the resolved note with `id`, if any.
    pub fn note(&self, id: &NoteId) -> Option<Note> {
        self.notes
            .get(id)
            .map(|raw| resolve_note(raw, self.tags.all()))
    }

    /// Returns the resolved notes matching `filter`, in note order.
    pub fn filter_notes(&mut self, filter: &NoteFilter) -> Vec<Note> {
        self.notes()
            .iter()
            .filter(|note| filter.matches(note))
            .cloned()
            .collect()
    }

    /// Creates a note and returns its freshly generated id.
    pub fn create_note(&mut self, data: NoteData) -> Result<NoteId> {
        let id = self.fresh_note_id();
        self.notes.create(&self.storage, id.clone(), &data)?;
        log::debug!("created note {id}");
        Ok(id)
    }

    /// Replaces title, body and tags of the note with `id`.
    ///
    /// Returns `Ok(false)` when no such note exists.
    pub fn update_note(&mut self, id: &NoteId, data: NoteData) -> Result<bool> {
        let updated = self.notes.update(&self.storage, id, &data)?;
        if updated {
            log::debug!("updated note {id}");
        }
        Ok(updated)
    }

    /// Deletes the note with `id`.
    ///
    /// Returns `Ok(false)` when no such note exists.
    pub fn delete_note(&mut self, id: &NoteId) -> Result<bool> {
        let deleted = self.notes.delete(&self.storage, id)?;
        if deleted {
            log::debug!("deleted note {id}");
        }
        Ok(deleted)
    }

    /// Adds an externally created tag.
    ///
    /// Returns `Ok(false)` when a tag with the same id already exists.
    pub fn add_tag(&mut self, tag: Tag) -> Result<bool> {
        let id = tag.id().clone();
        let added = self.tags.add(&self.storage, tag)?;
        if added {
            log::debug!("added tag {id}");
        }
        Ok(added)
    }

    /// Creates a tag with a freshly generated id.
    pub fn create_tag(&mut self, label: impl Into<String>) -> Result<Tag> {
        let tag = Tag::new(self.fresh_tag_id(), label);
        self.tags.add(&self.storage, tag.clone())?;
        log::debug!("created tag {} ({})", tag.id(), tag.label());
        Ok(tag)
    }

    /// Renames the tag with `id`.
    ///
    /// Returns `Ok(false)` when no such tag exists.
    pub fn update_tag(&mut self, id: &TagId, label: &str) -> Result<bool> {
        Ok(self.tags.rename(&self.storage, id, label)?)
    }

    /// Deletes the tag with `id`.
    ///
    /// Notes keep their references to the deleted id; the join view stops
    /// showing it. Returns `Ok(false)` when no such tag exists.
    pub fn delete_tag(&mut self, id: &TagId) -> Result<bool> {
        let deleted = self.tags.delete(&self.storage, id)?;
        if deleted {
            log::debug!("deleted tag {id}");
        }
        Ok(deleted)
    }

    /// Removes note references to tags that no longer exist.
    ///
    /// Returns the number of references removed. Never called implicitly.
    pub fn prune_orphaned_tag_ids(&mut self) -> Result<usize> {
        let existing: HashSet<&TagId> = self.tags.all().iter().map(Tag::id).collect();
        let removed = self.notes.prune_tag_ids(&self.storage, &existing)?;
        if removed > 0 {
            log::info!("pruned {removed} orphaned tag references");
        }
        Ok(removed)
    }

    fn fresh_note_id(&mut self) -> NoteId {
        loop {
            let id = NoteId::new(self.ids.next_id());
            if !self.notes.contains(&id) {
                return id;
            }
        }
    }

    fn fresh_tag_id(&mut self) -> TagId {
        loop {
            let id = TagId::new(self.ids.next_id());
            if !self.tags.contains(&id) {
                return id;
            }
        }
    }
}
