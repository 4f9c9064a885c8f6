//! Typed boundary to the REST backend.
//!
//! Every endpoint the client consumes gets an explicit response shape here,
//! validated and narrowed into domain types before anything downstream sees
//! it. The backend itself sits behind the [`Backend`] trait so tests can
//! substitute a scripted double for the `reqwest` implementation.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use campus_core::model::{
    Course, CourseId, Question, QuestionOption, Quiz, QuizId, Role, User, UserId,
};

use crate::error::ApiError;

//
// ─── DOMAIN-FACING SHAPES ──────────────────────────────────────────────────────
//

/// Successful login/registration: the bearer token plus the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

/// Registration form fields, sent verbatim to the backend.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Completion status for one quiz and user, as reported by the backend.
///
/// `answers` carries the previously submitted option indices with `-1` for
/// unanswered slots; the attempt loop narrows them defensively.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuizStatus {
    pub completed: bool,
    pub score: Option<u32>,
    pub answers: Option<Vec<i64>>,
}

//
// ─── BACKEND CONTRACT ──────────────────────────────────────────────────────────
//

/// The REST backend as the client consumes it.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// `ApiError::Unauthorized` for rejected credentials, other `ApiError`
    /// variants for transport or payload failures.
    async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError>;

    /// `POST /auth/register`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport or payload failures.
    async fn register(&self, registration: &Registration) -> Result<AuthPayload, ApiError>;

    /// `GET /courses`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport or payload failures.
    async fn list_courses(&self, token: &str) -> Result<Vec<Course>, ApiError>;

    /// `GET /courses/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport or payload failures.
    async fn get_course(&self, token: &str, id: CourseId) -> Result<Course, ApiError>;

    /// `GET /quizzes/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport or payload failures, including
    /// `ApiError::Invalid` for a quiz that fails boundary validation.
    async fn get_quiz(&self, token: &str, id: QuizId) -> Result<Quiz, ApiError>;

    /// `GET /quizzes/{id}/status`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport or payload failures.
    async fn quiz_status(&self, token: &str, id: QuizId) -> Result<QuizStatus, ApiError>;

    /// `POST /quizzes/{id}/submit`. Returns the authoritative score.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport or payload failures.
    async fn submit_quiz(&self, token: &str, id: QuizId, answers: &[i64]) -> Result<u32, ApiError>;
}

//
// ─── WIRE SHAPES ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    user: UserDto,
}

impl AuthResponse {
    fn into_payload(self) -> Result<AuthPayload, ApiError> {
        Ok(AuthPayload {
            token: self.token,
            user: self.user.into_user()?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct UserDto {
    id: u64,
    name: String,
    email: String,
    role: String,
}

impl UserDto {
    fn into_user(self) -> Result<User, ApiError> {
        // Role normalization happens here, at the boundary where sessions
        // are written. Unknown roles are rejected, not smuggled through.
        let role: Role = self
            .role
            .parse()
            .map_err(|err| ApiError::Invalid(format!("{err}")))?;
        Ok(User::new(UserId::new(self.id), self.name, self.email, role))
    }
}

#[derive(Debug, Deserialize)]
struct CourseDto {
    id: u64,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    quiz_ids: Vec<u64>,
}

impl From<CourseDto> for Course {
    fn from(dto: CourseDto) -> Self {
        Course {
            id: CourseId::new(dto.id),
            title: dto.title,
            description: dto.description,
            quiz_ids: dto.quiz_ids.into_iter().map(QuizId::new).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OptionDto {
    text: String,
    #[serde(default)]
    is_correct: bool,
}

#[derive(Debug, Deserialize)]
struct QuestionDto {
    text: String,
    options: Vec<OptionDto>,
}

#[derive(Debug, Deserialize)]
struct QuizDto {
    id: u64,
    title: String,
    #[serde(default)]
    description: String,
    time_limit_minutes: i64,
    questions: Vec<QuestionDto>,
}

impl QuizDto {
    fn into_quiz(self) -> Result<Quiz, ApiError> {
        let questions = self
            .questions
            .into_iter()
            .map(|question| Question {
                text: question.text,
                options: question
                    .options
                    .into_iter()
                    .map(|option| QuestionOption {
                        text: option.text,
                        is_correct: option.is_correct,
                    })
                    .collect(),
            })
            .collect();
        Quiz::new(
            QuizId::new(self.id),
            self.title,
            self.description,
            self.time_limit_minutes,
            questions,
        )
        .map_err(|err| ApiError::Invalid(err.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct QuizStatusDto {
    completed: bool,
    #[serde(default)]
    score: Option<i64>,
    #[serde(default)]
    answers: Option<Vec<i64>>,
}

impl From<QuizStatusDto> for QuizStatus {
    fn from(dto: QuizStatusDto) -> Self {
        QuizStatus {
            completed: dto.completed,
            score: dto.score.and_then(|value| u32::try_from(value).ok()),
            answers: dto.answers,
        }
    }
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    answers: &'a [i64],
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    score: i64,
}

//
// ─── HTTP IMPLEMENTATION ───────────────────────────────────────────────────────
//

/// `reqwest`-backed [`Backend`].
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::Endpoint(err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.client.get(url).bearer_auth(token).send().await?;
        decode(response).await
    }

    async fn post_json<B, T>(&self, path: &str, token: Option<&str>, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let mut request = self.client.post(url).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        return Err(ApiError::Status(status));
    }
    Ok(response.json().await?)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError> {
        let response: AuthResponse = self
            .post_json("auth/login", None, &LoginRequest { email, password })
            .await?;
        response.into_payload()
    }

    async fn register(&self, registration: &Registration) -> Result<AuthPayload, ApiError> {
        let response: AuthResponse = self.post_json("auth/register", None, registration).await?;
        response.into_payload()
    }

    async fn list_courses(&self, token: &str) -> Result<Vec<Course>, ApiError> {
        let dtos: Vec<CourseDto> = self.get_json("courses", token).await?;
        Ok(dtos.into_iter().map(Course::from).collect())
    }

    async fn get_course(&self, token: &str, id: CourseId) -> Result<Course, ApiError> {
        let dto: CourseDto = self.get_json(&format!("courses/{id}"), token).await?;
        Ok(dto.into())
    }

    async fn get_quiz(&self, token: &str, id: QuizId) -> Result<Quiz, ApiError> {
        let dto: QuizDto = self.get_json(&format!("quizzes/{id}"), token).await?;
        dto.into_quiz()
    }

    async fn quiz_status(&self, token: &str, id: QuizId) -> Result<QuizStatus, ApiError> {
        let dto: QuizStatusDto = self.get_json(&format!("quizzes/{id}/status"), token).await?;
        Ok(dto.into())
    }

    async fn submit_quiz(&self, token: &str, id: QuizId, answers: &[i64]) -> Result<u32, ApiError> {
        let response: SubmitResponse = self
            .post_json(
                &format!("quizzes/{id}/submit"),
                Some(token),
                &SubmitRequest { answers },
            )
            .await?;
        Ok(u32::try_from(response.score).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_dto_narrows_into_a_validated_quiz() {
        let dto: QuizDto = serde_json::from_str(
            r#"{
                "id": 4,
                "title": "Basics",
                "time_limit_minutes": 10,
                "questions": [
                    {"text": "Q1", "options": [{"text": "a"}, {"text": "b", "is_correct": true}]}
                ]
            }"#,
        )
        .unwrap();
        let quiz = dto.into_quiz().unwrap();
        assert_eq!(quiz.id(), QuizId::new(4));
        assert_eq!(quiz.question_count(), 1);
        assert!(quiz.questions()[0].options[1].is_correct);
        assert!(!quiz.questions()[0].options[0].is_correct);
    }

    #[test]
    fn invalid_quiz_payload_is_rejected_at_the_boundary() {
        let dto: QuizDto = serde_json::from_str(
            r#"{"id": 4, "title": "Bad", "time_limit_minutes": 10,
                "questions": [{"text": "Q1", "options": []}]}"#,
        )
        .unwrap();
        assert!(matches!(dto.into_quiz(), Err(ApiError::Invalid(_))));
    }

    #[test]
    fn auth_response_rejects_unknown_roles() {
        let response: AuthResponse = serde_json::from_str(
            r#"{"token": "t", "user": {"id": 1, "name": "N", "email": "e", "role": "root"}}"#,
        )
        .unwrap();
        assert!(matches!(response.into_payload(), Err(ApiError::Invalid(_))));
    }

    #[test]
    fn status_dto_drops_negative_scores() {
        let dto: QuizStatusDto =
            serde_json::from_str(r#"{"completed": true, "score": -2}"#).unwrap();
        let status = QuizStatus::from(dto);
        assert!(status.completed);
        assert_eq!(status.score, None);
    }
}
