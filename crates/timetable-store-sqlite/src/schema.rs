//! SQL schema for the timetable SQLite store.
//!
//! Executed once at connection startup. The four reference tables are
//! deliberately identical in shape so one set of statements can serve all
//! of them with only the table name substituted.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS groups (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS subjects (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS teachers (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL     -- full name ('fio')
);

CREATE TABLE IF NOT EXISTS rooms (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL     -- room number, kept as text
);

-- The fact table. Every column is nullable: the model tolerates partially
-- specified lessons, and deleting a referenced row nulls the key here
-- instead of cascading.
CREATE TABLE IF NOT EXISTS entries (
    id         INTEGER PRIMARY KEY,
    date       TEXT,      -- ISO YYYY-MM-DD when supplied natively, else free text
    time       TEXT,
    kind       TEXT,      -- lesson type
    subject_id INTEGER REFERENCES subjects(id),
    group_id   INTEGER REFERENCES groups(id),
    teacher_id INTEGER REFERENCES teachers(id),
    room_id    INTEGER REFERENCES rooms(id)
);

CREATE INDEX IF NOT EXISTS entries_date_idx    ON entries(date);
CREATE INDEX IF NOT EXISTS entries_group_idx   ON entries(group_id);
CREATE INDEX IF NOT EXISTS entries_teacher_idx ON entries(teacher_id);

PRAGMA user_version = 1;
";
