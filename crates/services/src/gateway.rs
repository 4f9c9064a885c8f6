use std::sync::Arc;

use campus_core::model::{Course, CourseId, Quiz, QuizId};

use crate::api::{Backend, QuizStatus};
use crate::error::ApiError;
use crate::session_service::SessionService;

/// The authenticated call site for the backend.
///
/// Attaches the bearer token from the session funnel to every request and
/// applies the process-wide 401 policy: any `Unauthorized` response clears
/// the persisted session before the error reaches a caller, so the next
/// guard evaluation redirects to login.
pub struct ApiGateway {
    backend: Arc<dyn Backend>,
    session: Arc<SessionService>,
}

impl ApiGateway {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, session: Arc<SessionService>) -> Self {
        Self { backend, session }
    }

    /// # Errors
    ///
    /// Returns `ApiError` from the backend; `ApiError::Unauthorized` when
    /// there is no session or the backend rejected the token.
    pub async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        let token = self.token()?;
        self.settle(self.backend.list_courses(&token).await).await
    }

    /// # Errors
    ///
    /// See [`ApiGateway::list_courses`].
    pub async fn get_course(&self, id: CourseId) -> Result<Course, ApiError> {
        let token = self.token()?;
        self.settle(self.backend.get_course(&token, id).await).await
    }

    /// # Errors
    ///
    /// See [`ApiGateway::list_courses`].
    pub async fn get_quiz(&self, id: QuizId) -> Result<Quiz, ApiError> {
        let token = self.token()?;
        self.settle(self.backend.get_quiz(&token, id).await).await
    }

    /// # Errors
    ///
    /// See [`ApiGateway::list_courses`].
    pub async fn quiz_status(&self, id: QuizId) -> Result<QuizStatus, ApiError> {
        let token = self.token()?;
        self.settle(self.backend.quiz_status(&token, id).await).await
    }

    /// # Errors
    ///
    /// See [`ApiGateway::list_courses`].
    pub async fn submit_quiz(&self, id: QuizId, answers: &[i64]) -> Result<u32, ApiError> {
        let token = self.token()?;
        self.settle(self.backend.submit_quiz(&token, id, answers).await)
            .await
    }

    fn token(&self) -> Result<String, ApiError> {
        self.session
            .current()
            .map(|session| session.token().to_owned())
            .ok_or(ApiError::Unauthorized)
    }

    async fn settle<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if matches!(result, Err(ApiError::Unauthorized)) {
            log::warn!("backend returned 401; clearing persisted session");
            if let Err(err) = self.session.clear().await {
                log::error!("failed to clear session after 401: {err}");
            }
        }
        result
    }
}
