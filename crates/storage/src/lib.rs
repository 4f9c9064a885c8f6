#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{InMemorySessionStore, SessionRecord, SessionStore, StorageError};
pub use sqlite::{SqliteInitError, SqliteStore};
