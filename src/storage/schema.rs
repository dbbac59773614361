/// Key-value schema for the SQLite storage backend.
///
/// Uses CREATE TABLE IF NOT EXISTS for idempotent execution.
pub const INITIAL_SCHEMA: &str = r#"
-- One row per storage slot; values are opaque strings (JSON collections)
CREATE TABLE IF NOT EXISTS storage (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);
"#;
