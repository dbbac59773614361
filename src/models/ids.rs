use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a note.
///
/// Wraps an opaque string id so note and tag references cannot be mixed up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Creates a new note ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying ID value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Unique identifier for a tag.
///
/// Wraps an opaque string id so note and tag references cannot be mixed up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(String);

impl TagId {
    /// Creates a new tag ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying ID value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TagId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_id_serializes_as_raw_string() {
        let id = NoteId::new("n-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""n-42""#);

        let deserialized: NoteId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn tag_id_serializes_as_raw_string() {
        let id = TagId::new("t1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""t1""#);
    }

    #[test]
    fn ids_are_not_interchangeable() {
        // These would fail to compile:
        // let note_id: NoteId = TagId::new("1");
        // let tag_id: TagId = NoteId::new("1");

        let note_id = NoteId::new("1");
        let tag_id = TagId::new("1");

        assert_eq!(note_id.as_str(), tag_id.as_str());
    }

    #[test]
    fn display_shows_raw_value() {
        assert_eq!(NoteId::from("abc").to_string(), "abc");
        assert_eq!(TagId::from("xyz").to_string(), "xyz");
    }
}
