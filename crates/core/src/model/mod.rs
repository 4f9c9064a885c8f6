mod course;
mod ids;
mod quiz;
mod role;
mod session;
mod user;

pub use course::Course;
pub use ids::{CourseId, ParseIdError, QuizId, UserId};
pub use quiz::{Question, QuestionOption, Quiz, QuizError};
pub use role::{Role, RoleParseError};
pub use session::{Session, SessionError};
pub use user::User;
