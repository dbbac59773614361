use serde::{Deserialize, Serialize};

use super::TagId;

/// A labeled category a note can reference.
///
/// Persisted as `{"id": ..., "label": ...}` in the `TAGS` slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    id: TagId,
    label: String,
}

impl Tag {
    /// Creates a new tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use marknote::{Tag, TagId};
    ///
    /// let tag = Tag::new(TagId::new("t1"), "work");
    /// assert_eq!(tag.id(), &TagId::new("t1"));
    /// assert_eq!(tag.label(), "work");
    /// ```
    pub fn new(id: TagId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    /// Returns the tag's unique identifier.
    pub fn id(&self) -> &TagId {
        &self.id
    }

    /// Returns the display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns a copy of this tag carrying a different label.
    pub fn relabeled(&self, label: impl Into<String>) -> Self {
        Self {
            id: self.id.clone(),
            label: label.into(),
        }
    }
}
