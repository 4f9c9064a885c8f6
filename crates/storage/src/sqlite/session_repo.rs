use async_trait::async_trait;
use sqlx::Row;

use crate::repository::{KEY_TOKEN, KEY_USER, SessionRecord, SessionStore, StorageError};

use super::SqliteStore;

#[async_trait]
impl SessionStore for SqliteStore {
    async fn load(&self) -> Result<Option<SessionRecord>, StorageError> {
        let rows = sqlx::query("SELECT key, value FROM kv WHERE key IN (?1, ?2)")
            .bind(KEY_TOKEN)
            .bind(KEY_USER)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let mut token = None;
        let mut user = None;
        for row in rows {
            let key: String = row
                .try_get("key")
                .map_err(|err| StorageError::Serialization(err.to_string()))?;
            let value: String = row
                .try_get("value")
                .map_err(|err| StorageError::Serialization(err.to_string()))?;
            match key.as_str() {
                k if k == KEY_TOKEN => token = Some(value),
                k if k == KEY_USER => user = Some(value),
                _ => {}
            }
        }

        // Both halves or nothing: a half-written store loads as no session.
        Ok(match (token, user) {
            (Some(token), Some(user)) => Some(SessionRecord { token, user }),
            _ => None,
        })
    }

    async fn save(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        for (key, value) in [(KEY_TOKEN, &record.token), (KEY_USER, &record.user)] {
            sqlx::query(
                r"
                INSERT INTO kv (key, value) VALUES (?1, ?2)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value
                ",
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv WHERE key IN (?1, ?2)")
            .bind(KEY_TOKEN)
            .bind(KEY_USER)
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
