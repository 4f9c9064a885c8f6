use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Storage key for the bearer token.
pub const KEY_TOKEN: &str = "token";
/// Storage key for the serialized user record.
pub const KEY_USER: &str = "user";

/// Persisted shape of the session: the raw token and the user record as an
/// opaque serialized string.
///
/// Parsing the user is the session funnel's job, so repositories stay dumb
/// about the record format and a corrupted value can be handled (treated as
/// absent) instead of failing the load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token: String,
    pub user: String,
}

/// Contract for the persisted session slot.
///
/// Both halves are written and removed together; `load` returns `None`
/// unless both are present.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the persisted session, if a complete one exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    async fn load(&self) -> Result<Option<SessionRecord>, StorageError>;

    /// Persist the session, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save(&self, record: &SessionRecord) -> Result<(), StorageError>;

    /// Remove any persisted session. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// String-keyed in-memory store for tests and ephemeral sessions.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one raw key directly, bypassing the record shape.
    ///
    /// Lets tests model a half-written or corrupted store.
    pub fn put_raw(&self, key: &str, value: &str) {
        let mut entries = lock(&self.entries);
        entries.insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self) -> Result<Option<SessionRecord>, StorageError> {
        let entries = lock(&self.entries);
        let token = entries.get(KEY_TOKEN);
        let user = entries.get(KEY_USER);
        Ok(match (token, user) {
            (Some(token), Some(user)) => Some(SessionRecord {
                token: token.clone(),
                user: user.clone(),
            }),
            _ => None,
        })
    }

    async fn save(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let mut entries = lock(&self.entries);
        entries.insert(KEY_TOKEN.to_string(), record.token.clone());
        entries.insert(KEY_USER.to_string(), record.user.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut entries = lock(&self.entries);
        entries.remove(KEY_TOKEN);
        entries.remove(KEY_USER);
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = InMemorySessionStore::new();
        let record = SessionRecord {
            token: "tok".into(),
            user: "{}".into(),
        };
        store.save(&record).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn load_requires_both_halves() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.load().await.unwrap(), None);

        store.put_raw(KEY_TOKEN, "tok");
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_removes_both_halves_and_is_idempotent() {
        let store = InMemorySessionStore::new();
        store
            .save(&SessionRecord {
                token: "tok".into(),
                user: "{}".into(),
            })
            .await
            .unwrap();

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
        store.clear().await.unwrap();
    }
}
