//! Fresh id generation for notes and tags.

use uuid::Uuid;

/// Source of fresh, unique ids.
pub trait IdGenerator {
    /// Returns an id that has not been returned before.
    fn next_id(&mut self) -> String;
}

/// Random UUID v4 ids, e.g. `"0b6e1f2c-..."`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic ids `"<prefix>-1"`, `"<prefix>-2"`, ...
///
/// Useful in tests where the generated ids must be predictable.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    /// Creates a generator starting at 1.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
