use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use campus_core::model::{Session, User};
use storage::repository::{SessionRecord, SessionStore};

use crate::error::SessionServiceError;

/// The single funnel for persisted session state.
///
/// Every read and write of the token/user pair goes through here: the guard
/// reads the cached copy synchronously at render time, and every mutation is
/// written through to the [`SessionStore`] before the cache changes, so the
/// persisted halves are always set and cleared together.
pub struct SessionService {
    store: Arc<dyn SessionStore>,
    current: RwLock<Option<Session>>,
}

impl SessionService {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            current: RwLock::new(None),
        }
    }

    /// Populate the cache from the persisted store.
    ///
    /// Fails closed: a missing half or an unreadable user record yields no
    /// session rather than an error, so corrupted state can never crash a
    /// view — it just looks signed out.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Storage` only when the store itself
    /// cannot be read.
    pub async fn load(&self) -> Result<(), SessionServiceError> {
        let record = self.store.load().await?;
        let session = record.and_then(parse_record);
        *self.write_lock() = session;
        Ok(())
    }

    /// The current session, freshly read. Cheap; called on every navigation
    /// to a protected route.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.read_lock().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read_lock().is_some()
    }

    /// Persist and cache a new session. Both halves are written in one store
    /// operation.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError` if the session is invalid, the user
    /// record cannot be serialized, or the store write fails. On failure the
    /// cached session is left unchanged.
    pub async fn set(&self, token: String, user: User) -> Result<(), SessionServiceError> {
        let session = Session::new(token, user)?;
        let record = SessionRecord {
            token: session.token().to_owned(),
            user: serde_json::to_string(session.user())
                .map_err(|err| SessionServiceError::Serialization(err.to_string()))?,
        };
        self.store.save(&record).await?;
        *self.write_lock() = Some(session);
        Ok(())
    }

    /// Drop the persisted and cached session. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Storage` if the store write fails; the
    /// cache is cleared regardless, so the process stops using the stale
    /// credentials either way.
    pub async fn clear(&self) -> Result<(), SessionServiceError> {
        let result = self.store.clear().await;
        *self.write_lock() = None;
        result.map_err(SessionServiceError::from)
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, Option<Session>> {
        match self.current.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn parse_record(record: SessionRecord) -> Option<Session> {
    let user: User = match serde_json::from_str(&record.user) {
        Ok(user) => user,
        Err(err) => {
            log::warn!("discarding unreadable persisted user record: {err}");
            return None;
        }
    };
    Session::new(record.token, user).ok()
}
