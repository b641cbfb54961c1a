//! Table definitions, applied at startup.
//!
//! Timestamps are RFC 3339 text. `deleted_at` marks a soft-deleted row; reads
//! filter on `deleted_at IS NULL`.

pub const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS cats (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT    NOT NULL,
        age         INTEGER NOT NULL CHECK (age >= 0),
        breed       TEXT    NOT NULL,
        weight      REAL    NOT NULL CHECK (weight >= 0),
        created_at  TEXT    NOT NULL,
        updated_at  TEXT    NOT NULL,
        deleted_at  TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS visits (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        date        TEXT    NOT NULL,
        motif       TEXT    NOT NULL,
        veterinaire TEXT    NOT NULL,
        cat_id      INTEGER REFERENCES cats (id) ON UPDATE CASCADE ON DELETE SET NULL,
        created_at  TEXT    NOT NULL,
        updated_at  TEXT    NOT NULL,
        deleted_at  TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_visits_cat_id ON visits (cat_id)",
    r#"
    CREATE TABLE IF NOT EXISTS treatments (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT    NOT NULL,
        visit_id    INTEGER NOT NULL REFERENCES visits (id) ON DELETE CASCADE,
        created_at  TEXT    NOT NULL,
        updated_at  TEXT    NOT NULL,
        deleted_at  TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_treatments_visit_id ON treatments (visit_id)",
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        email         TEXT    NOT NULL UNIQUE,
        password      TEXT    NOT NULL,
        role          TEXT    NOT NULL DEFAULT 'user',
        refresh_token TEXT,
        created_at    TEXT    NOT NULL,
        updated_at    TEXT    NOT NULL,
        deleted_at    TEXT
    )
    "#,
];
