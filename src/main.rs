use std::fs::File;
use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use marknote::{
    Config, IdGenerator, NoteData, NoteFilter, NoteId, Notebook, SqliteStorage, Storage, Tag,
    TagId,
};
use simplelog::{ConfigBuilder, WriteLogger};
use thiserror::Error;

/// marknote - tagged notes kept in a local key-value store
#[derive(Parser)]
#[command(name = "marknote")]
#[command(about = "Create, edit, tag and delete notes stored locally")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// List notes, optionally filtered by title and tags
    List(ListCommand),
    /// Create a new note
    New(NewCommand),
    /// Show a single note
    Show {
        /// Note id
        id: String,
    },
    /// Edit an existing note; omitted fields keep their current value
    Edit(EditCommand),
    /// Delete a note
    Delete {
        /// Note id
        id: String,
    },
    /// List all tags
    Tags,
    /// Create a tag
    TagAdd {
        /// Tag label
        label: String,
    },
    /// Rename a tag
    TagRename {
        /// Tag id
        id: String,
        /// New label
        label: String,
    },
    /// Delete a tag (notes keep their reference until pruned)
    TagDelete {
        /// Tag id
        id: String,
    },
    /// Remove references to deleted tags from all notes
    Prune,
}

#[derive(Parser)]
struct ListCommand {
    /// Only notes whose title contains this text
    #[arg(long)]
    title: Option<String>,

    /// Only notes carrying this tag label (repeatable)
    #[arg(short, long = "tag", value_name = "LABEL")]
    tags: Vec<String>,
}

#[derive(Parser)]
struct NewCommand {
    /// Note title
    #[arg(long)]
    title: String,

    /// Note body
    #[arg(long)]
    body: String,

    /// Tag label to attach; missing tags are created (repeatable)
    #[arg(short, long = "tag", value_name = "LABEL")]
    tags: Vec<String>,
}

#[derive(Parser)]
struct EditCommand {
    /// Note id
    id: String,

    /// New title
    #[arg(long)]
    title: Option<String>,

    /// New body
    #[arg(long)]
    body: Option<String>,

    /// Replace the note's tags with these labels (repeatable)
    #[arg(short, long = "tag", value_name = "LABEL")]
    tags: Vec<String>,

    /// Remove all tags from the note
    #[arg(long, conflicts_with = "tags")]
    clear_tags: bool,
}

/// An error caused by invalid input rather than a failure of the tool.
#[derive(Debug, Error)]
enum UserError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("no note with id {0}")]
    UnknownNote(String),

    #[error("no tag with id {0}")]
    UnknownTag(String),

    #[error("no tag labeled '{0}'")]
    UnknownLabel(String),
}

fn main() {
    let cli = Cli::parse();

    let result = run(&cli);

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        log::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::from_env()?;
    config.ensure_data_dir()?;
    init_logging(&config);

    let storage = SqliteStorage::open(config.database_path()).with_context(|| {
        format!(
            "Failed to open storage at {}",
            config.database_path().display()
        )
    })?;
    let mut notebook = Notebook::open(storage);

    let stdout = io::stdout();
    execute(&cli.command, &mut notebook, &mut stdout.lock())
}

/// Installs a file logger; logging stays disabled if the file cannot be created.
fn init_logging(config: &Config) {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::options()
        .create(true)
        .append(true)
        .open(config.log_path())
    {
        let _ = WriteLogger::init(config.log_level, log_config, log_file);
    }
}

/// Determines if an error is a user error (vs internal error).
fn is_user_error(error: &anyhow::Error) -> bool {
    error.downcast_ref::<UserError>().is_some()
}

/// Runs one command against `notebook`, writing human-readable output to `out`.
///
/// Separated from `run` so tests can use in-memory storage.
fn execute<S, G, W>(command: &Commands, notebook: &mut Notebook<S, G>, out: &mut W) -> Result<()>
where
    S: Storage,
    G: IdGenerator,
    W: Write,
{
    match command {
        Commands::List(cmd) => {
            let filter = NoteFilter {
                title: cmd.title.clone().unwrap_or_default(),
                tag_ids: lookup_labels(notebook, &cmd.tags)?,
            };
            for note in notebook.filter_notes(&filter) {
                writeln!(out, "{}  {}{}", note.id, note.title, format_tags(&note.tags))?;
            }
        }
        Commands::New(cmd) => {
            require_present("title", &cmd.title)?;
            require_present("body", &cmd.body)?;
            let tags = resolve_labels(notebook, &cmd.tags)?;
            let id = notebook
                .create_note(NoteData::new(&cmd.title, &cmd.body).with_tags(tags))
                .context("Failed to create note")?;
            writeln!(out, "Note created (id: {id})")?;
        }
        Commands::Show { id } => {
            let note = notebook
                .note(&NoteId::new(id.as_str()))
                .ok_or_else(|| UserError::UnknownNote(id.clone()))?;
            writeln!(out, "{}{}", note.title, format_tags(&note.tags))?;
            writeln!(out)?;
            writeln!(out, "{}", note.body)?;
        }
        Commands::Edit(cmd) => {
            let id = NoteId::new(cmd.id.as_str());
            let mut data = notebook
                .note(&id)
                .ok_or_else(|| UserError::UnknownNote(cmd.id.clone()))?
                .to_data();

            if let Some(title) = &cmd.title {
                require_present("title", title)?;
                data.title = title.clone();
            }
            if let Some(body) = &cmd.body {
                require_present("body", body)?;
                data.body = body.clone();
            }
            if cmd.clear_tags {
                data.tags.clear();
            } else if !cmd.tags.is_empty() {
                data.tags = resolve_labels(notebook, &cmd.tags)?;
            }

            notebook
                .update_note(&id, data)
                .context("Failed to update note")?;
            writeln!(out, "Note updated (id: {id})")?;
        }
        Commands::Delete { id } => {
            let deleted = notebook
                .delete_note(&NoteId::new(id.as_str()))
                .context("Failed to delete note")?;
            if !deleted {
                return Err(UserError::UnknownNote(id.clone()).into());
            }
            writeln!(out, "Note deleted (id: {id})")?;
        }
        Commands::Tags => {
            for tag in notebook.tags() {
                writeln!(out, "{}  {}", tag.id(), tag.label())?;
            }
        }
        Commands::TagAdd { label } => {
            require_present("label", label)?;
            let tag = match notebook.tag_by_label(label) {
                Some(existing) => existing.clone(),
                None => notebook
                    .create_tag(label.trim())
                    .context("Failed to create tag")?,
            };
            writeln!(out, "Tag {} (id: {})", tag.label(), tag.id())?;
        }
        Commands::TagRename { id, label } => {
            require_present("label", label)?;
            let renamed = notebook
                .update_tag(&TagId::new(id.as_str()), label.trim())
                .context("Failed to rename tag")?;
            if !renamed {
                return Err(UserError::UnknownTag(id.clone()).into());
            }
            writeln!(out, "Tag renamed (id: {id})")?;
        }
        Commands::TagDelete { id } => {
            let deleted = notebook
                .delete_tag(&TagId::new(id.as_str()))
                .context("Failed to delete tag")?;
            if !deleted {
                return Err(UserError::UnknownTag(id.clone()).into());
            }
            writeln!(out, "Tag deleted (id: {id})")?;
        }
        Commands::Prune => {
            let removed = notebook
                .prune_orphaned_tag_ids()
                .context("Failed to prune tag references")?;
            writeln!(out, "Removed {removed} orphaned tag references")?;
        }
    }

    Ok(())
}

/// Rejects empty or whitespace-only input.
fn require_present(field: &'static str, value: &str) -> Result<(), UserError> {
    if value.trim().is_empty() {
        return Err(UserError::Empty(field));
    }
    Ok(())
}

/// Maps labels to existing tags, creating a tag for every unknown label.
fn resolve_labels<S: Storage, G: IdGenerator>(
    notebook: &mut Notebook<S, G>,
    labels: &[String],
) -> Result<Vec<Tag>> {
    let mut tags: Vec<Tag> = Vec::new();
    for label in labels.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        let tag = match notebook.tag_by_label(label) {
            Some(existing) => existing.clone(),
            None => notebook
                .create_tag(label)
                .with_context(|| format!("Failed to create tag '{label}'"))?,
        };
        if !tags.iter().any(|t| t.id() == tag.id()) {
            tags.push(tag);
        }
    }
    Ok(tags)
}

/// Maps labels to the ids of existing tags; unknown labels are a user error.
fn lookup_labels<S: Storage, G: IdGenerator>(
    notebook: &Notebook<S, G>,
    labels: &[String],
) -> Result<Vec<TagId>> {
    labels
        .iter()
        .map(|label| {
            notebook
                .tag_by_label(label)
                .map(|tag| tag.id().clone())
                .ok_or_else(|| anyhow::Error::from(UserError::UnknownLabel(label.clone())))
        })
        .collect()
}

fn format_tags(tags: &[Tag]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let labels: Vec<&str> = tags.iter().map(Tag::label).collect();
    format!("  [{}]", labels.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use marknote::{MemoryStorage, SequentialIds};

    type TestNotebook = Notebook<MemoryStorage, SequentialIds>;

    fn notebook() -> TestNotebook {
        Notebook::with_id_generator(MemoryStorage::new(), SequentialIds::new("id"))
    }

    fn run_command(notebook: &mut TestNotebook, args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("marknote").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        execute(&cli.command, notebook, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn new_creates_note_and_missing_tags() {
        let mut notebook = notebook();

        let output = run_command(
            &mut notebook,
            &["new", "--title", "A", "--body", "x", "-t", "work", "-t", "Work"],
        )
        .unwrap();

        assert_eq!(output, "Note created (id: id-2)\n");
        assert_eq!(notebook.tags().len(), 1);
        let note = notebook.note(&NoteId::new("id-2")).unwrap();
        assert_eq!(note.tags[0].label(), "work");
    }

    #[test]
    fn new_rejects_empty_title() {
        let mut notebook = notebook();

        let err = run_command(&mut notebook, &["new", "--title", "  ", "--body", "x"]).unwrap_err();

        assert!(is_user_error(&err));
        assert!(err.to_string().contains("cannot be empty"));
        assert!(notebook.raw_notes().is_empty());
    }

    #[test]
    fn list_filters_by_tag_label() {
        let mut notebook = notebook();
        run_command(&mut notebook, &["new", "--title", "A", "--body", "x", "-t", "work"]).unwrap();
        run_command(&mut notebook, &["new", "--title", "B", "--body", "y"]).unwrap();

        let output = run_command(&mut notebook, &["list", "-t", "work"]).unwrap();

        assert_eq!(output, "id-2  A  [work]\n");
    }

    #[test]
    fn list_with_unknown_label_is_user_error() {
        let mut notebook = notebook();

        let err = run_command(&mut notebook, &["list", "-t", "nope"]).unwrap_err();
        assert!(is_user_error(&err));
    }

    #[test]
    fn edit_keeps_omitted_fields() {
        let mut notebook = notebook();
        run_command(&mut notebook, &["new", "--title", "A", "--body", "x", "-t", "work"]).unwrap();

        run_command(&mut notebook, &["edit", "id-2", "--title", "A2"]).unwrap();

        let note = notebook.note(&NoteId::new("id-2")).unwrap();
        assert_eq!(note.title, "A2");
        assert_eq!(note.body, "x");
        assert_eq!(note.tags.len(), 1);
    }

    #[test]
    fn edit_clear_tags_removes_all_tags() {
        let mut notebook = notebook();
        run_command(&mut notebook, &["new", "--title", "A", "--body", "x", "-t", "work"]).unwrap();

        run_command(&mut notebook, &["edit", "id-2", "--clear-tags"]).unwrap();

        assert!(notebook.note(&NoteId::new("id-2")).unwrap().tags.is_empty());
    }

    #[test]
    fn show_unknown_note_is_user_error() {
        let mut notebook = notebook();

        let err = run_command(&mut notebook, &["show", "missing"]).unwrap_err();
        assert!(is_user_error(&err));
    }

    #[test]
    fn tag_delete_then_prune() {
        let mut notebook = notebook();
        run_command(&mut notebook, &["new", "--title", "A", "--body", "x", "-t", "work"]).unwrap();

        run_command(&mut notebook, &["tag-delete", "id-1"]).unwrap();
        let output = run_command(&mut notebook, &["show", "id-2"]).unwrap();
        assert_eq!(output, "A\n\nx\n");

        let output = run_command(&mut notebook, &["prune"]).unwrap();
        assert_eq!(output, "Removed 1 orphaned tag references\n");
    }

    #[test]
    fn tag_add_reuses_existing_label() {
        let mut notebook = notebook();

        run_command(&mut notebook, &["tag-add", "work"]).unwrap();
        let output = run_command(&mut notebook, &["tag-add", "WORK"]).unwrap();

        assert_eq!(output, "Tag work (id: id-1)\n");
        assert_eq!(notebook.tags().len(), 1);
    }

    #[test]
    fn tag_rename_unknown_is_user_error() {
        let mut notebook = notebook();

        let err = run_command(&mut notebook, &["tag-rename", "nope", "x"]).unwrap_err();
        assert!(is_user_error(&err));
    }

    #[test]
    fn write_failure_is_internal_error() {
        let mut notebook =
            Notebook::with_id_generator(MemoryStorage::with_quota(16), SequentialIds::new("id"));

        let err = run_command(&mut notebook, &["new", "--title", "A", "--body", "x"]).unwrap_err();

        assert!(!is_user_error(&err));
        assert!(err.downcast_ref::<marknote::NotebookError>().is_some());
        assert!(format!("{err:#}").starts_with("Failed to create note"));
    }

    #[test]
    fn format_tags_joins_labels() {
        let tags = vec![
            Tag::new(TagId::new("a"), "work"),
            Tag::new(TagId::new("b"), "home"),
        ];
        assert_eq!(format_tags(&tags), "  [work, home]");
        assert_eq!(format_tags(&[]), "");
    }
}
