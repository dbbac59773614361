use serde::{Deserialize, Serialize};

use super::{NoteId, Tag, TagId};

/// The persisted form of a note.
///
/// Tags are referenced by id only. Duplicate and dangling ids are tolerated
/// and filtered out when the note is joined against the tag registry.
///
/// The JSON layout is `{"id", "title", "markdown", "tagIds"}`; `"body"` is
/// accepted in place of `"markdown"` when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNote {
    id: NoteId,
    title: String,
    #[serde(rename = "markdown", alias = "body")]
    body: String,
    #[serde(default)]
    tag_ids: Vec<TagId>,
}

impl RawNote {
    /// Creates a raw note from its parts.
    pub fn new(
        id: NoteId,
        title: impl Into<String>,
        body: impl Into<String>,
        tag_ids: Vec<TagId>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            tag_ids,
        }
    }

    /// Builds a raw note from form data, keeping only the tag ids.
    pub fn from_data(id: NoteId, data: &NoteData) -> Self {
        Self {
            id,
            title: data.title.clone(),
            body: data.body.clone(),
            tag_ids: data.tag_ids(),
        }
    }

    /// Returns the note id.
    pub fn id(&self) -> &NoteId {
        &self.id
    }

    /// Returns the note title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the free-text body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the referenced tag ids in insertion order.
    pub fn tag_ids(&self) -> &[TagId] {
        &self.tag_ids
    }

    /// Returns a new record with this note's id and everything else taken
    /// from `data`.
    pub fn updated(&self, data: &NoteData) -> Self {
        Self::from_data(self.id.clone(), data)
    }

    /// Returns a new record that keeps only the tag ids accepted by `keep`.
    pub fn retain_tag_ids(&self, mut keep: impl FnMut(&TagId) -> bool) -> Self {
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            body: self.body.clone(),
            tag_ids: self.tag_ids.iter().filter(|&id| keep(id)).cloned().collect(),
        }
    }
}

/// Note fields as submitted by a form: title, body and the selected tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteData {
    pub title: String,
    pub body: String,
    pub tags: Vec<Tag>,
}

impl NoteData {
    /// Creates note data without tags.
    ///
    /// # Examples
    ///
    /// ```
    /// use marknote::{NoteData, Tag, TagId};
    ///
    /// let data = NoteData::new("Groceries", "- milk")
    ///     .with_tags(vec![Tag::new(TagId::new("t1"), "home")]);
    ///
    /// assert_eq!(data.title, "Groceries");
    /// assert_eq!(data.tag_ids(), vec![TagId::new("t1")]);
    /// ```
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            tags: Vec::new(),
        }
    }

    /// Sets the selected tags.
    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// Returns the ids of the selected tags, in selection order.
    pub fn tag_ids(&self) -> Vec<TagId> {
        self.tags.iter().map(|tag| tag.id().clone()).collect()
    }
}

/// A note with its tag references resolved against the tag registry.
///
/// This is a read-only projection and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub body: String,
    pub tags: Vec<Tag>,
}

impl Note {
    /// Returns true when one of the resolved tags has the given id.
    pub fn has_tag(&self, id: &TagId) -> bool {
        self.tags.iter().any(|tag| tag.id() == id)
    }

    /// Converts the view back into form data, as an edit form would prefill it.
    pub fn to_data(&self) -> NoteData {
        NoteData {
            title: self.title.clone(),
            body: self.body.clone(),
            tags: self.tags.clone(),
        }
    }
}
