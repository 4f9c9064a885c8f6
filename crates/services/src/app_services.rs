use std::sync::Arc;

use url::Url;

use storage::repository::SessionStore;
use storage::sqlite::SqliteStore;

use crate::api::{Backend, HttpBackend};
use crate::attempt_loop::AttemptLoopService;
use crate::auth_service::AuthService;
use crate::course_service::CourseService;
use crate::error::AppServicesError;
use crate::gateway::ApiGateway;
use crate::session_service::SessionService;
use crate::Clock;

/// Assembles the app-facing services around one backend and one store.
#[derive(Clone)]
pub struct AppServices {
    session: Arc<SessionService>,
    auth: Arc<AuthService>,
    courses: Arc<CourseService>,
    attempt_loop: Arc<AttemptLoopService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP backend.
    ///
    /// Loads any persisted session into the funnel as part of startup.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the API URL is invalid or storage
    /// initialization fails.
    pub async fn new_sqlite(db_url: &str, api_url: &str) -> Result<Self, AppServicesError> {
        let api_url =
            Url::parse(api_url).map_err(|err| AppServicesError::InvalidApiUrl(err.to_string()))?;
        let store = SqliteStore::open(db_url).await?;
        let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(api_url));
        Self::from_parts(backend, Arc::new(store), Clock::default_clock()).await
    }

    /// Wire services from explicit parts. Used by `new_sqlite` and by tests
    /// that substitute a scripted backend or an in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Session` if the persisted session cannot
    /// be read.
    pub async fn from_parts(
        backend: Arc<dyn Backend>,
        store: Arc<dyn SessionStore>,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let session = Arc::new(SessionService::new(store));
        session.load().await?;

        let gateway = Arc::new(ApiGateway::new(Arc::clone(&backend), Arc::clone(&session)));
        let auth = Arc::new(AuthService::new(backend, Arc::clone(&session)));
        let courses = Arc::new(CourseService::new(Arc::clone(&gateway)));
        let attempt_loop = Arc::new(AttemptLoopService::new(gateway, clock));

        Ok(Self {
            session,
            auth,
            courses,
            attempt_loop,
        })
    }

    #[must_use]
    pub fn session(&self) -> Arc<SessionService> {
        Arc::clone(&self.session)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn courses(&self) -> Arc<CourseService> {
        Arc::clone(&self.courses)
    }

    #[must_use]
    pub fn attempt_loop(&self) -> Arc<AttemptLoopService> {
        Arc::clone(&self.attempt_loop)
    }
}
