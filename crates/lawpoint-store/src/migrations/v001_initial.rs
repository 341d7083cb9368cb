//! v001 -- Initial schema creation.
//!
//! A single `documents` table holds every collection. `seq` preserves
//! insertion order so collections read back in the order they were written.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    collection  TEXT NOT NULL,                -- clients, lawyers, cases, ...
    id          TEXT NOT NULL,                -- the document's own "id" field
    body        TEXT NOT NULL,                -- JSON object
    inserted_at TEXT NOT NULL,                -- RFC-3339
    updated_at  TEXT NOT NULL,

    UNIQUE (collection, id)
);

CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection, seq);
"#;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
