use std::sync::Arc;

use services::{AttemptLoopService, AuthService, CourseService, SessionService};

/// What the composition root must provide to the UI.
pub trait UiApp: Send + Sync {
    fn session(&self) -> Arc<SessionService>;
    fn auth(&self) -> Arc<AuthService>;
    fn courses(&self) -> Arc<CourseService>;
    fn attempt_loop(&self) -> Arc<AttemptLoopService>;
}

#[derive(Clone)]
pub struct AppContext {
    session: Arc<SessionService>,
    auth: Arc<AuthService>,
    courses: Arc<CourseService>,
    attempt_loop: Arc<AttemptLoopService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            session: app.session(),
            auth: app.auth(),
            courses: app.courses(),
            attempt_loop: app.attempt_loop(),
        }
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

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
