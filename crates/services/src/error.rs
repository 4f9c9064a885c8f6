//! Shared error types for the services crate.

use thiserror::Error;

use campus_core::attempt::AttemptError;
use campus_core::model::SessionError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors from the REST backend boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The backend rejected the bearer token (HTTP 401). Handled
    /// process-wide: the gateway clears the persisted session before this
    /// reaches a caller.
    #[error("not authorized")]
    Unauthorized,
    #[error("request failed with status {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid payload: {0}")]
    Invalid(String),
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the session funnel.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionServiceError {
    #[error(transparent)]
    InvalidSession(#[from] SessionError),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Api(ApiError),
    #[error(transparent)]
    Session(#[from] SessionServiceError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        // A 401 from the auth endpoints means the credentials were wrong,
        // not that an existing session went stale.
        match err {
            ApiError::Unauthorized => AuthError::InvalidCredentials,
            other => AuthError::Api(other),
        }
    }
}

/// Errors emitted by `CourseService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CourseServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `AttemptLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AttemptServiceError {
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Session(#[from] SessionServiceError),
    #[error("invalid api url: {0}")]
    InvalidApiUrl(String),
}
