use std::sync::Arc;

use campus_core::Clock;
use campus_core::attempt::{Attempt, AttemptPhase};
use campus_core::model::QuizId;

use crate::error::AttemptServiceError;
use crate::gateway::ApiGateway;

/// Unanswered slots travel as `-1` on the wire.
const UNANSWERED: i64 = -1;

/// Drives one quiz attempt against the backend.
///
/// Owns the network half of the attempt lifecycle: loading the quiz and its
/// completion status into a machine, and the submission round-trip. The
/// countdown itself belongs to the owning view, which calls
/// [`Attempt::tick`] once per second.
///
/// Submission is split into [`begin`](Self::begin) /
/// [`send_answers`](Self::send_answers) / [`settle`](Self::settle) so a UI
/// can keep the machine reachable (and ticking) while the request is in
/// flight; [`submit`](Self::submit) composes the three for callers without
/// that constraint.
pub struct AttemptLoopService {
    gateway: Arc<ApiGateway>,
    clock: Clock,
}

impl AttemptLoopService {
    #[must_use]
    pub fn new(gateway: Arc<ApiGateway>, clock: Clock) -> Self {
        Self { gateway, clock }
    }

    /// Fetch the quiz and its completion status and build the machine.
    ///
    /// A quiz the server reports as completed reconstructs directly into
    /// `Submitted` with the reported score and answers; otherwise the
    /// attempt waits in `NotStarted` for the user's confirmation.
    ///
    /// # Errors
    ///
    /// Returns `AttemptServiceError` for backend failures.
    pub async fn load_attempt(&self, quiz_id: QuizId) -> Result<Attempt, AttemptServiceError> {
        let quiz = self.gateway.get_quiz(quiz_id).await?;
        let status = self.gateway.quiz_status(quiz_id).await?;

        if status.completed {
            let answers = status
                .answers
                .unwrap_or_default()
                .into_iter()
                .map(|raw| usize::try_from(raw).ok())
                .collect();
            return Ok(Attempt::from_completed(
                quiz,
                status.score.unwrap_or(0),
                answers,
            ));
        }

        Ok(Attempt::new(quiz))
    }

    /// Confirm the start of an attempt.
    ///
    /// # Errors
    ///
    /// Returns `AttemptServiceError::Attempt` if the attempt was already
    /// started.
    pub fn start(&self, attempt: &mut Attempt) -> Result<AttemptPhase, AttemptServiceError> {
        Ok(attempt.start(self.clock.now())?)
    }

    /// Mark a submission in flight and encode the answers for the wire.
    ///
    /// # Errors
    ///
    /// Returns `AttemptServiceError::Attempt` when the attempt is not
    /// submittable or a submission is already pending.
    pub fn begin(&self, attempt: &mut Attempt) -> Result<Vec<i64>, AttemptServiceError> {
        let wire = attempt
            .begin_submission()?
            .iter()
            .map(|slot| slot.map_or(UNANSWERED, |index| index as i64))
            .collect();
        Ok(wire)
    }

    /// The network leg of a submission. Holds no reference to the attempt,
    /// so the caller's machine stays reachable while this is in flight.
    ///
    /// # Errors
    ///
    /// Returns `AttemptServiceError::Api` for a failed round-trip.
    pub async fn send_answers(
        &self,
        quiz_id: QuizId,
        answers: &[i64],
    ) -> Result<u32, AttemptServiceError> {
        Ok(self.gateway.submit_quiz(quiz_id, answers).await?)
    }

    /// Apply the outcome of the network leg to the machine.
    ///
    /// On success the attempt freezes in `Submitted` with the server's
    /// score. On failure the phase is restored (`InProgress` or `Expired`)
    /// and the answers are untouched, so the caller may retry. No local
    /// score is ever fabricated.
    ///
    /// # Errors
    ///
    /// Propagates the failed outcome, or returns
    /// `AttemptServiceError::Attempt` if no submission was pending.
    pub fn settle(
        &self,
        attempt: &mut Attempt,
        outcome: Result<u32, AttemptServiceError>,
    ) -> Result<u32, AttemptServiceError> {
        match outcome {
            Ok(score) => {
                attempt.complete_submission(score, self.clock.now())?;
                Ok(score)
            }
            Err(err) => {
                log::warn!("quiz submission failed: {err}");
                attempt.submission_failed()?;
                Err(err)
            }
        }
    }

    /// One-shot submission: begin, send, settle.
    ///
    /// # Errors
    ///
    /// Returns `AttemptServiceError::Attempt` when the attempt is not
    /// submittable, `AttemptServiceError::Api` for a failed round-trip.
    pub async fn submit(&self, attempt: &mut Attempt) -> Result<u32, AttemptServiceError> {
        let wire = self.begin(attempt)?;
        let outcome = self.send_answers(attempt.quiz().id(), &wire).await;
        self.settle(attempt, outcome)
    }
}
