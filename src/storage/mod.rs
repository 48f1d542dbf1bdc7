//! Storage backends

mod sqlite;

pub use sqlite::SqliteStorage;
