use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::QuizId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("quiz title must not be empty")]
    EmptyTitle,
    #[error("question {0} has no options")]
    OptionlessQuestion(usize),
}

/// One selectable answer for a question.
///
/// `is_correct` is display-only on the client: after submission it drives the
/// per-question highlighting. The server is the sole authority for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub options: Vec<QuestionOption>,
}

/// A quiz definition as fetched from the backend. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    id: QuizId,
    title: String,
    description: String,
    time_limit_minutes: i64,
    questions: Vec<Question>,
}

impl Quiz {
    /// Validate and build a quiz from boundary data.
    ///
    /// A non-positive time limit is accepted here; an attempt over such a
    /// quiz is expired the moment it starts.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` for an empty title or a question with no options.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        description: impl Into<String>,
        time_limit_minutes: i64,
        questions: Vec<Question>,
    ) -> Result<Self, QuizError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        if let Some(index) = questions.iter().position(|q| q.options.is_empty()) {
            return Err(QuizError::OptionlessQuestion(index));
        }
        Ok(Self {
            id,
            title,
            description: description.into(),
            time_limit_minutes,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn time_limit_minutes(&self) -> i64 {
        self.time_limit_minutes
    }

    /// The full time budget in seconds. May be non-positive for a malformed
    /// quiz; callers treat that as already expired rather than erroring.
    #[must_use]
    pub fn time_limit_seconds(&self) -> i64 {
        self.time_limit_minutes.saturating_mul(60)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(text: &str, is_correct: bool) -> QuestionOption {
        QuestionOption {
            text: text.to_string(),
            is_correct,
        }
    }

    #[test]
    fn rejects_empty_title() {
        let err = Quiz::new(QuizId::new(1), "  ", "", 30, Vec::new()).unwrap_err();
        assert_eq!(err, QuizError::EmptyTitle);
    }

    #[test]
    fn rejects_question_without_options() {
        let questions = vec![Question {
            text: "Q1".into(),
            options: vec![option("a", true)],
        }, Question {
            text: "Q2".into(),
            options: Vec::new(),
        }];
        let err = Quiz::new(QuizId::new(1), "T", "", 30, questions).unwrap_err();
        assert_eq!(err, QuizError::OptionlessQuestion(1));
    }

    #[test]
    fn time_limit_seconds_saturates() {
        let quiz = Quiz::new(QuizId::new(1), "T", "", i64::MAX, Vec::new()).unwrap();
        assert_eq!(quiz.time_limit_seconds(), i64::MAX);
        let quiz = Quiz::new(QuizId::new(1), "T", "", -5, Vec::new()).unwrap();
        assert_eq!(quiz.time_limit_seconds(), -300);
    }
}
