//! Architecture Validation Integration Tests
//!
//! The notebook core must be usable from the crate root alone, without any of
//! the CLI types (`Cli`, `Commands`, ...) that live in main.rs. Storage is
//! injected, so the same code runs against SQLite or an in-memory map.

use anyhow::Result;
use marknote::{
    IdGenerator, JoinView, MemoryStorage, NoteData, NoteFilter, NoteRegistry, Notebook,
    SequentialIds, SqliteStorage, Storage, TagRegistry,
};

/// Runs the same short session against any storage backend.
fn exercise<S: Storage, G: IdGenerator>(mut notebook: Notebook<S, G>) -> Result<()> {
    let work = notebook.create_tag("work")?;
    let id = notebook.create_note(NoteData::new("Plan", "ship it").with_tags(vec![work.clone()]))?;

    let filter = NoteFilter {
        title: "plan".to_string(),
        tag_ids: vec![work.id().clone()],
    };
    let found = notebook.filter_notes(&filter);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, id);

    notebook.delete_note(&id)?;
    assert!(notebook.notes().is_empty());
    Ok(())
}

#[test]
fn test_notebook_runs_on_sqlite_storage() -> Result<()> {
    exercise(Notebook::open(SqliteStorage::in_memory()?))
}

#[test]
fn test_notebook_runs_on_memory_storage() -> Result<()> {
    exercise(Notebook::with_id_generator(
        MemoryStorage::new(),
        SequentialIds::new("n"),
    ))
}

#[test]
fn test_notebook_runs_on_boxed_storage() -> Result<()> {
    let storage: Box<dyn Storage> = Box::new(MemoryStorage::new());
    exercise(Notebook::open(storage))
}

#[test]
fn test_registries_and_join_view_compose_without_notebook() -> Result<()> {
    // Two independent slot containers sharing one storage backend
    let storage = MemoryStorage::new();
    let mut notes = NoteRegistry::load(&storage);
    let mut tags = TagRegistry::load(&storage);
    let mut view = JoinView::new();

    let tag = marknote::Tag::new(marknote::TagId::new("t1"), "work");
    tags.add(&storage, tag.clone())?;
    let created = notes.create(
        &storage,
        marknote::NoteId::new("n1"),
        &NoteData::new("A", "x").with_tags(vec![tag.clone()]),
    )?;
    assert!(created);

    let joined = view.notes(&notes, &tags);
    assert_eq!(joined.len(), 1);
    assert_eq!(joined[0].tags, vec![tag]);
    assert_eq!(storage.len(), 2);

    Ok(())
}
