use storage::repository::{SessionRecord, SessionStore};
use storage::sqlite::SqliteStore;

async fn open_store() -> SqliteStore {
    SqliteStore::open("sqlite::memory:")
        .await
        .expect("in-memory sqlite should open")
}

#[tokio::test]
async fn fresh_store_has_no_session() {
    let store = open_store().await;
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn save_load_clear_round_trip() {
    let store = open_store().await;
    let record = SessionRecord {
        token: "bearer-abc".into(),
        user: r#"{"id":1,"name":"Ada","email":"ada@example.org","role":"student"}"#.into(),
    };

    store.save(&record).await.unwrap();
    assert_eq!(store.load().await.unwrap(), Some(record.clone()));

    // Overwrite replaces, never duplicates.
    let replacement = SessionRecord {
        token: "bearer-def".into(),
        user: record.user.clone(),
    };
    store.save(&replacement).await.unwrap();
    assert_eq!(store.load().await.unwrap(), Some(replacement));

    store.clear().await.unwrap();
    assert_eq!(store.load().await.unwrap(), None);
    store.clear().await.unwrap();
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let store = open_store().await;
    store.migrate().await.unwrap();
    store.migrate().await.unwrap();
}
