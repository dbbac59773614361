use crate::slot::LocalSlot;
use crate::storage::{Storage, StorageError};
use crate::{Tag, TagId};

/// Storage key holding the serialized tag collection.
pub const TAGS_KEY: &str = "TAGS";

/// The flat collection of tags.
///
/// Deleting a tag never touches notes; references to it are filtered out
/// by the join view instead.
#[derive(Debug)]
pub struct TagRegistry {
    slot: LocalSlot<Vec<Tag>>,
}

impl TagRegistry {
    /// Loads the registry from the `TAGS` slot, empty if absent or corrupt.
    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        Self {
            slot: LocalSlot::load(storage, TAGS_KEY, Vec::new()),
        }
    }

    /// Returns all tags in insertion order.
    pub fn all(&self) -> &[Tag] {
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

    /// Looks up a tag by id.
    pub fn get(&self, id: &TagId) -> Option<&Tag> {
        self.all().iter().find(|tag| tag.id() == id)
    }

    pub fn contains(&self, id: &TagId) -> bool {
        self.get(id).is_some()
    }

    /// Finds the first tag whose label matches, ignoring case and
    /// surrounding whitespace.
    pub fn find_by_label(&self, label: &str) -> Option<&Tag> {
        let wanted = label.trim().to_lowercase();
        self.all()
            .iter()
            .find(|tag| tag.label().trim().to_lowercase() == wanted)
    }

    /// Appends `tag`.
    ///
    /// Returns `Ok(false)` without writing when a tag with the same id
    /// already exists.
    pub fn add<S: Storage + ?Sized>(
        &mut self,
        storage: &S,
        tag: Tag,
    ) -> Result<bool, StorageError> {
        if self.contains(tag.id()) {
            return Ok(false);
        }

        let mut next = self.all().to_vec();
        next.push(tag);
        self.slot.set(storage, next)?;
        Ok(true)
    }

    /// Replaces the label of the tag with `id`.
    ///
    /// Returns `Ok(false)` without writing when no such tag exists.
    pub fn rename<S: Storage + ?Sized>(
        &mut self,
        storage: &S,
        id: &TagId,
        label: &str,
    ) -> Result<bool, StorageError> {
        if !self.contains(id) {
            return Ok(false);
        }

        let next = self
            .all()
            .iter()
            .map(|tag| {
                if tag.id() == id {
                    tag.relabeled(label)
                } else {
                    tag.clone()
                }
            })
            .collect();
        self.slot.set(storage, next)?;
        Ok(true)
    }

    /// Removes the tag with `id`.
    ///
    /// Returns `Ok(false)` without writing when no such tag exists.
    pub fn delete<S: Storage + ?Sized>(
        &mut self,
        storage: &S,
        id: &TagId,
    ) -> Result<bool, StorageError> {
        if !self.contains(id) {
            return Ok(false);
        }

        let next = self
            .all()
            .iter()
            .filter(|tag| tag.id() != id)
            .cloned()
            .collect();
        self.slot.set(storage, next)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot;
    use crate::storage::MemoryStorage;

    fn tag(id: &str, label: &str) -> Tag {
        Tag::new(TagId::new(id), label)
    }

    #[test]
    fn add_appends_and_persists() {
        let storage = MemoryStorage::new();
        let mut tags = TagRegistry::load(&storage);

        assert!(tags.add(&storage, tag("t1", "work")).unwrap());
        assert!(tags.add(&storage, tag("t2", "home")).unwrap());

        assert_eq!(tags.all(), &[tag("t1", "work"), tag("t2", "home")]);
        let persisted: Vec<Tag> = slot::read(&storage, TAGS_KEY, Vec::new());
        assert_eq!(persisted, tags.all());
    }

    #[test]
    fn add_existing_id_is_noop() {
        let storage = MemoryStorage::new();
        let mut tags = TagRegistry::load(&storage);
        tags.add(&storage, tag("t1", "work")).unwrap();

        assert!(!tags.add(&storage, tag("t1", "other")).unwrap());
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.get(&TagId::new("t1")).unwrap().label(), "work");
        assert_eq!(tags.version(), 1);
    }

    #[test]
    fn rename_changes_only_label() {
        let storage = MemoryStorage::new();
        let mut tags = TagRegistry::load(&storage);
        tags.add(&storage, tag("t1", "work")).unwrap();
        tags.add(&storage, tag("t2", "home")).unwrap();

        assert!(tags.rename(&storage, &TagId::new("t1"), "office").unwrap());
        assert_eq!(tags.all(), &[tag("t1", "office"), tag("t2", "home")]);
    }

    #[test]
    fn rename_unknown_id_is_noop() {
        let storage = MemoryStorage::new();
        let mut tags = TagRegistry::load(&storage);

        assert!(!tags.rename(&storage, &TagId::new("nope"), "x").unwrap());
        assert!(storage.is_empty());
    }

    #[test]
    fn delete_removes_matching_tag() {
        let storage = MemoryStorage::new();
        let mut tags = TagRegistry::load(&storage);
        tags.add(&storage, tag("t1", "work")).unwrap();
        tags.add(&storage, tag("t2", "home")).unwrap();

        assert!(tags.delete(&storage, &TagId::new("t1")).unwrap());
        assert!(!tags.delete(&storage, &TagId::new("t1")).unwrap());
        assert_eq!(tags.all(), &[tag("t2", "home")]);
    }

    #[test]
    fn find_by_label_ignores_case_and_whitespace() {
        let storage = MemoryStorage::new();
        let mut tags = TagRegistry::load(&storage);
        tags.add(&storage, tag("t1", "Work")).unwrap();

        assert_eq!(tags.find_by_label(" work ").unwrap().id(), &TagId::new("t1"));
        assert!(tags.find_by_label("home").is_none());
    }
}
