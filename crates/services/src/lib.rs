#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod attempt_loop;
pub mod auth_service;
pub mod course_service;
pub mod error;
pub mod gateway;
pub mod session_service;

pub use campus_core::Clock;

pub use api::{AuthPayload, Backend, HttpBackend, QuizStatus, Registration};
pub use app_services::AppServices;
pub use attempt_loop::AttemptLoopService;
pub use auth_service::AuthService;
pub use course_service::CourseService;
pub use error::{
    ApiError, AppServicesError, AttemptServiceError, AuthError, CourseServiceError,
    SessionServiceError,
};
pub use gateway::ApiGateway;
pub use session_service::SessionService;
