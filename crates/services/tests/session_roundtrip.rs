use std::sync::Arc;

use campus_core::model::{Role, User, UserId};
use services::SessionService;
use storage::repository::{InMemorySessionStore, KEY_TOKEN, KEY_USER, SessionStore};

fn user(role: Role) -> User {
    User::new(UserId::new(1), "Ada", "ada@example.org", role)
}

#[tokio::test]
async fn session_survives_a_restart_of_the_funnel() {
    let store = Arc::new(InMemorySessionStore::new());

    let first = SessionService::new(Arc::clone(&store) as Arc<dyn SessionStore>);
    first
        .set("tok-9".into(), user(Role::Student))
        .await
        .unwrap();

    // A fresh funnel over the same store models an app restart.
    let second = SessionService::new(store);
    second.load().await.unwrap();
    let session = second.current().expect("persisted session should load");
    assert_eq!(session.token(), "tok-9");
    assert_eq!(session.role(), Role::Student);
}

#[tokio::test]
async fn clearing_signs_the_next_start_out() {
    let store = Arc::new(InMemorySessionStore::new());
    let service = SessionService::new(Arc::clone(&store) as Arc<dyn SessionStore>);
    service.set("tok".into(), user(Role::Admin)).await.unwrap();
    service.clear().await.unwrap();
    assert_eq!(service.current(), None);

    let restarted = SessionService::new(store);
    restarted.load().await.unwrap();
    assert_eq!(restarted.current(), None);
}

#[tokio::test]
async fn corrupted_user_record_fails_closed() {
    let store = Arc::new(InMemorySessionStore::new());
    store.put_raw(KEY_TOKEN, "tok");
    store.put_raw(KEY_USER, "{not valid json");

    let service = SessionService::new(store);
    service.load().await.unwrap();
    assert_eq!(service.current(), None);
}

#[tokio::test]
async fn user_record_with_unknown_role_fails_closed() {
    let store = Arc::new(InMemorySessionStore::new());
    store.put_raw(KEY_TOKEN, "tok");
    store.put_raw(
        KEY_USER,
        r#"{"id":1,"name":"Ada","email":"ada@example.org","role":"superuser"}"#,
    );

    let service = SessionService::new(store);
    service.load().await.unwrap();
    assert_eq!(service.current(), None);
}

#[tokio::test]
async fn persisted_role_casing_is_normalized_on_load() {
    let store = Arc::new(InMemorySessionStore::new());
    store.put_raw(KEY_TOKEN, "tok");
    store.put_raw(
        KEY_USER,
        r#"{"id":1,"name":"Ada","email":"ada@example.org","role":"ADMIN"}"#,
    );

    let service = SessionService::new(store);
    service.load().await.unwrap();
    let session = service.current().expect("session should load");
    assert_eq!(session.role(), Role::Admin);
}

#[tokio::test]
async fn token_only_store_is_treated_as_signed_out() {
    let store = Arc::new(InMemorySessionStore::new());
    store.put_raw(KEY_TOKEN, "tok");

    let service = SessionService::new(store);
    service.load().await.unwrap();
    assert_eq!(service.current(), None);
}
