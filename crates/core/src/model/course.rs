use serde::{Deserialize, Serialize};

use super::{CourseId, QuizId};

/// A course as listed for the signed-in user. Display-only on the client;
/// course management stays behind the backend API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub quiz_ids: Vec<QuizId>,
}
