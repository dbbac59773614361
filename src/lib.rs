pub mod config;
pub mod ids;
pub mod join;
pub mod models;
pub mod notebook;
pub mod registry;
pub mod slot;
pub mod storage;

pub use config::Config;
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use join::JoinView;
pub use models::{Note, NoteData, NoteId, RawNote, Tag, TagId};
pub use notebook::{NoteFilter, Notebook, NotebookError};
pub use registry::{NOTES_KEY, NoteRegistry, TAGS_KEY, TagRegistry};
pub use storage::{MemoryStorage, SqliteStorage, Storage, StorageError};
