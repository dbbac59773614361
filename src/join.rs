//! Resolution of note tag references into tag records.

use std::collections::HashSet;

use crate::registry::{NoteRegistry, TagRegistry};
use crate::{Note, RawNote, Tag, TagId};

/// Returns the tags referenced by `note`, in tag registry order.
///
/// A tag appears at most once even when the note references it repeatedly.
/// References to tags missing from `tags` are skipped.
pub fn resolve_tags(note: &RawNote, tags: &[Tag]) -> Vec<Tag> {
    let wanted: HashSet<&TagId> = note.tag_ids().iter().collect();
    tags.iter()
        .filter(|tag| wanted.contains(tag.id()))
        .cloned()
        .collect()
}

/// Builds the view of a single note.
pub fn resolve_note(note: &RawNote, tags: &[Tag]) -> Note {
    Note {
        id: note.id().clone(),
        title: note.title().to_string(),
        body: note.body().to_string(),
        tags: resolve_tags(note, tags),
    }
}

/// Resolves every note against the given tags.
pub fn resolve_all(notes: &[RawNote], tags: &[Tag]) -> Vec<Note> {
    notes.iter().map(|note| resolve_note(note, tags)).collect()
}

/// Memoized join of the note and tag registries.
///
/// The cached result is keyed by both registries' versions and rebuilt only
/// after one of them changed.
#[derive(Debug, Default)]
pub struct JoinView {
    cached: Option<Cached>,
}

#[derive(Debug)]
struct Cached {
    notes_version: u64,
    tags_version: u64,
    notes: Vec<Note>,
}

impl JoinView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every note with its tags resolved.
    pub fn notes(&mut self, notes: &NoteRegistry, tags: &TagRegistry) -> &[Note] {
        if !self.is_fresh(notes, tags) {
            log::debug!(
                "rebuilding join view (notes v{}, tags v{})",
                notes.version(),
                tags.version()
            );
            self.cached = Some(Cached {
                notes_version: notes.version(),
                tags_version: tags.version(),
                notes: resolve_all(notes.all(), tags.all()),
            });
        }

        match &self.cached {
            Some(c) => &c.notes,
            None => &[],
        }
    }

    fn is_fresh(&self, notes: &NoteRegistry, tags: &TagRegistry) -> bool {
        self.cached.as_ref().is_some_and(|c| {
            c.notes_version == notes.version() && c.tags_version == tags.version()
        })
    }
}
