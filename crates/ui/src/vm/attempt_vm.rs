use campus_core::attempt::{Attempt, AttemptPhase, TickOutcome};
use campus_core::model::QuizId;
use services::error::AttemptServiceError;
use services::{ApiError, AttemptLoopService};

use crate::views::ViewError;

/// What the quiz view can ask of an attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptIntent {
    /// Confirm the start screen and arm the countdown.
    Start,
    /// Record an answer for a question.
    Select { question: usize, option: usize },
    /// Move the view to another question. Never touches recorded answers.
    GoTo { question: usize },
    /// Ask to submit; may require an extra confirmation when incomplete.
    Submit,
    /// Confirm the incomplete-submission prompt (or auto-submit on expiry).
    ConfirmSubmit,
    /// Decline the incomplete-submission prompt.
    CancelSubmit,
}

/// How a submit request should proceed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitDisposition {
    /// Every question answered: send now.
    Send,
    /// Unanswered questions remain: ask the user first.
    NeedsConfirmation,
    /// Not submittable in the current phase.
    Blocked,
}

/// View-model for one mounted quiz attempt.
pub struct AttemptVm {
    attempt: Attempt,
    current_question: usize,
    confirming_submit: bool,
}

impl AttemptVm {
    #[must_use]
    pub fn new(attempt: Attempt) -> Self {
        Self {
            attempt,
            current_question: 0,
            confirming_submit: false,
        }
    }

    #[must_use]
    pub fn attempt(&self) -> &Attempt {
        &self.attempt
    }

    #[must_use]
    pub fn phase(&self) -> AttemptPhase {
        self.attempt.phase()
    }

    #[must_use]
    pub fn current_question(&self) -> usize {
        self.current_question
    }

    #[must_use]
    pub fn confirming_submit(&self) -> bool {
        self.confirming_submit
    }

    /// Confirm the start screen.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the attempt was already started.
    pub fn start(&mut self, service: &AttemptLoopService) -> Result<AttemptPhase, ViewError> {
        service
            .start(&mut self.attempt)
            .map_err(|_| ViewError::Unknown)
    }

    /// Record an answer for a question. Errors (wrong phase, racing
    /// submission) are reported but leave the attempt untouched.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` when the machine rejects the edit.
    pub fn select(&mut self, question: usize, option: usize) -> Result<(), ViewError> {
        self.attempt
            .select_answer(question, option)
            .map_err(|_| ViewError::Unknown)
    }

    /// Move to another question, clamped to the quiz bounds.
    pub fn go_to(&mut self, question: usize) {
        let last = self.attempt.question_count().saturating_sub(1);
        self.current_question = question.min(last);
    }

    /// Advance the countdown by one second. Delegates to the machine, which
    /// ignores ticks outside `InProgress`.
    pub fn tick(&mut self) -> TickOutcome {
        self.attempt.tick()
    }

    /// Ask to submit. Complete attempts are cleared to send; incomplete
    /// in-progress attempts raise the confirmation prompt instead.
    pub fn request_submit(&mut self) -> SubmitDisposition {
        if !self.attempt.can_submit() {
            return SubmitDisposition::Blocked;
        }
        if self.attempt.is_complete() {
            return SubmitDisposition::Send;
        }
        self.confirming_submit = true;
        SubmitDisposition::NeedsConfirmation
    }

    /// Decline the incomplete-submission prompt; the attempt is unchanged.
    pub fn cancel_submit(&mut self) {
        self.confirming_submit = false;
    }

    /// Mark a submission in flight and capture the wire payload.
    ///
    /// Split from [`AttemptVm::settle_submit`] so the owning view never has
    /// to hold the attempt across the network await — ticks keep landing on
    /// the machine while the request is in flight.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` when the attempt is not submittable or a
    /// submission is already pending.
    pub fn begin_submit(
        &mut self,
        service: &AttemptLoopService,
    ) -> Result<(QuizId, Vec<i64>), ViewError> {
        self.confirming_submit = false;
        let quiz_id = self.attempt.quiz().id();
        service
            .begin(&mut self.attempt)
            .map(|wire| (quiz_id, wire))
            .map_err(|err| map_submit_error(&err))
    }

    /// Apply the outcome of the network leg.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::SessionExpired` on a 401 (the session is already
    /// cleared by then) and `ViewError::SubmitFailed` otherwise; in both
    /// cases the attempt remains retryable.
    pub fn settle_submit(
        &mut self,
        service: &AttemptLoopService,
        outcome: Result<u32, AttemptServiceError>,
    ) -> Result<u32, ViewError> {
        service
            .settle(&mut self.attempt, outcome)
            .map_err(|err| map_submit_error(&err))
    }
}

fn map_submit_error(err: &AttemptServiceError) -> ViewError {
    match err {
        AttemptServiceError::Api(ApiError::Unauthorized) => ViewError::SessionExpired,
        AttemptServiceError::Api(_) => ViewError::SubmitFailed,
        _ => ViewError::Unknown,
    }
}

/// Fetch the quiz + status and wrap the machine for the view.
///
/// # Errors
///
/// Returns `ViewError::SessionExpired` on a 401 and `ViewError::LoadFailed`
/// for other backend failures.
pub async fn load_attempt(
    service: &AttemptLoopService,
    quiz_id: QuizId,
) -> Result<AttemptVm, ViewError> {
    let attempt = service.load_attempt(quiz_id).await.map_err(|err| match err {
        AttemptServiceError::Api(ApiError::Unauthorized) => ViewError::SessionExpired,
        _ => ViewError::LoadFailed,
    })?;
    Ok(AttemptVm::new(attempt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::model::{Question, QuestionOption, Quiz};
    use campus_core::time::fixed_now;

    fn quiz(questions: usize) -> Quiz {
        let questions = (0..questions)
            .map(|index| Question {
                text: format!("Q{index}"),
                options: vec![
                    QuestionOption {
                        text: "a".into(),
                        is_correct: false,
                    },
                    QuestionOption {
                        text: "b".into(),
                        is_correct: true,
                    },
                ],
            })
            .collect();
        Quiz::new(QuizId::new(1), "T", "", 5, questions).unwrap()
    }

    fn in_progress_vm(questions: usize) -> AttemptVm {
        let mut attempt = Attempt::new(quiz(questions));
        attempt.start(fixed_now()).unwrap();
        AttemptVm::new(attempt)
    }

    #[test]
    fn navigation_clamps_and_preserves_answers() {
        let mut vm = in_progress_vm(3);
        vm.select(0, 1).unwrap();
        vm.go_to(2);
        vm.select(2, 0).unwrap();
        vm.go_to(99);
        assert_eq!(vm.current_question(), 2);

        vm.go_to(0);
        assert_eq!(vm.attempt().answer(0), Some(1));
        assert_eq!(vm.attempt().answer(2), Some(0));
    }

    #[test]
    fn incomplete_submit_asks_for_confirmation() {
        let mut vm = in_progress_vm(2);
        vm.select(0, 0).unwrap();

        assert_eq!(vm.request_submit(), SubmitDisposition::NeedsConfirmation);
        assert!(vm.confirming_submit());

        // Declining changes nothing about the attempt.
        vm.cancel_submit();
        assert!(!vm.confirming_submit());
        assert_eq!(vm.phase(), AttemptPhase::InProgress);
        assert_eq!(vm.attempt().answer(0), Some(0));
    }

    #[test]
    fn complete_submit_sends_without_confirmation() {
        let mut vm = in_progress_vm(1);
        vm.select(0, 1).unwrap();
        assert_eq!(vm.request_submit(), SubmitDisposition::Send);
        assert!(!vm.confirming_submit());
    }

    #[test]
    fn expired_incomplete_submit_is_blocked() {
        let mut vm = in_progress_vm(2);
        while !matches!(
            vm.tick(),
            TickOutcome::ExpiredIncomplete | TickOutcome::Idle
        ) {}
        assert_eq!(vm.phase(), AttemptPhase::Expired);
        assert_eq!(vm.request_submit(), SubmitDisposition::Blocked);
    }

    #[test]
    fn submitted_attempt_blocks_further_submits() {
        let attempt = Attempt::from_completed(quiz(2), 2, vec![Some(1), Some(1)]);
        let mut vm = AttemptVm::new(attempt);
        assert_eq!(vm.request_submit(), SubmitDisposition::Blocked);
        assert_eq!(vm.tick(), TickOutcome::Idle);
    }
}
