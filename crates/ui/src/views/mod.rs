mod admin;
mod course;
mod courses;
mod guard;
mod login;
mod quiz;
mod register;
mod state;
mod unauthorized;

pub use admin::AdminView;
pub use course::CourseView;
pub use courses::CoursesView;
pub use guard::{Guarded, SessionExpiredRedirect};
pub use login::LoginView;
pub use quiz::QuizView;
pub use register::RegisterView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use unauthorized::UnauthorizedView;
