use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::Quiz;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttemptError {
    #[error("attempt already started")]
    AlreadyStarted,
    #[error("attempt is not in progress")]
    NotInProgress,
    #[error("attempt cannot be submitted in its current state")]
    NotSubmittable,
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("no submission in flight")]
    NoSubmissionInFlight,
    #[error("question index {0} out of range")]
    QuestionOutOfRange(usize),
    #[error("option index {0} out of range")]
    OptionOutOfRange(usize),
}

//
// ─── PHASES AND TICKS ──────────────────────────────────────────────────────────
//

/// Where one attempt currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptPhase {
    /// Loaded but waiting for the start confirmation.
    NotStarted,
    /// Countdown running, answers editable.
    InProgress,
    /// Countdown hit zero before submission. Answers frozen; submission is
    /// only possible if every question was already answered.
    Expired,
    /// Graded by the server. Terminal: answers and score are immutable.
    Submitted,
}

/// Result of one countdown tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown still running.
    Running { seconds_remaining: u32 },
    /// Reached zero with every question answered; the caller should submit.
    ExpiredComplete,
    /// Reached zero with unanswered questions; the attempt stays `Expired`
    /// and is not auto-submitted.
    ExpiredIncomplete,
    /// No countdown is active in the current phase. Ticks that race a phase
    /// change (e.g. a resolving submission) land here and change nothing.
    Idle,
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// One student's pass through a quiz, from start confirmation to the graded
/// result.
///
/// The machine is pure and synchronous: the owning view drives the wall
/// clock by calling [`Attempt::tick`] once per second, and the submission
/// round-trip is bracketed by [`Attempt::begin_submission`] and either
/// [`Attempt::complete_submission`] or [`Attempt::submission_failed`], so a
/// transport failure leaves the attempt retryable.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    quiz: Quiz,
    answers: Vec<Option<usize>>,
    seconds_remaining: u32,
    phase: AttemptPhase,
    score: Option<u32>,
    submitting: bool,
    started_at: Option<DateTime<Utc>>,
    submitted_at: Option<DateTime<Utc>>,
}

impl Attempt {
    /// Fresh attempt over a quiz the server reports as not yet completed.
    #[must_use]
    pub fn new(quiz: Quiz) -> Self {
        let answers = vec![None; quiz.question_count()];
        Self {
            quiz,
            answers,
            seconds_remaining: 0,
            phase: AttemptPhase::NotStarted,
            score: None,
            submitting: false,
            started_at: None,
            submitted_at: None,
        }
    }

    /// Reconstruct a completed attempt from server status, entering
    /// `Submitted` directly with no confirmation step and no timer.
    ///
    /// The answer list is normalized defensively: missing slots become
    /// unanswered and out-of-range option indices are dropped rather than
    /// trusted.
    #[must_use]
    pub fn from_completed(quiz: Quiz, score: u32, answers: Vec<Option<usize>>) -> Self {
        let mut normalized: Vec<Option<usize>> = answers
            .into_iter()
            .zip(quiz.questions())
            .map(|(slot, question)| slot.filter(|&index| index < question.options.len()))
            .collect();
        normalized.resize(quiz.question_count(), None);

        Self {
            quiz,
            answers: normalized,
            seconds_remaining: 0,
            phase: AttemptPhase::Submitted,
            score: Some(score),
            submitting: false,
            started_at: None,
            submitted_at: None,
        }
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────
    //

    /// Confirm the start of the attempt.
    ///
    /// Sets the countdown to the quiz's full time budget. A quiz with a
    /// non-positive time limit is expired at this instant instead of
    /// starting a countdown.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::AlreadyStarted` outside `NotStarted`.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<AttemptPhase, AttemptError> {
        if self.phase != AttemptPhase::NotStarted {
            return Err(AttemptError::AlreadyStarted);
        }

        self.started_at = Some(now);
        let budget = self.quiz.time_limit_seconds();
        if budget <= 0 {
            self.seconds_remaining = 0;
            self.phase = AttemptPhase::Expired;
        } else {
            self.seconds_remaining = u32::try_from(budget).unwrap_or(u32::MAX);
            self.phase = AttemptPhase::InProgress;
        }
        Ok(self.phase)
    }

    /// Record the answer for one question.
    ///
    /// Only permitted while in progress with no submission in flight.
    /// Answers for other questions are untouched.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NotInProgress` outside `InProgress`,
    /// `AttemptError::SubmissionInFlight` while a submission is pending, and
    /// range errors for invalid indices.
    pub fn select_answer(&mut self, question: usize, option: usize) -> Result<(), AttemptError> {
        if self.phase != AttemptPhase::InProgress {
            return Err(AttemptError::NotInProgress);
        }
        if self.submitting {
            return Err(AttemptError::SubmissionInFlight);
        }
        let options = self
            .quiz
            .questions()
            .get(question)
            .map(|q| q.options.len())
            .ok_or(AttemptError::QuestionOutOfRange(question))?;
        if option >= options {
            return Err(AttemptError::OptionOutOfRange(option));
        }

        self.answers[question] = Some(option);
        Ok(())
    }

    /// Advance the countdown by one second.
    ///
    /// A no-op outside `InProgress`, so a tick that races a concurrently
    /// resolving submission can never overwrite `Submitted`. The counter
    /// clamps at zero; at zero the attempt leaves `InProgress` at that
    /// instant and the outcome reports whether the answer set was complete
    /// (the auto-submit decision point).
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != AttemptPhase::InProgress {
            return TickOutcome::Idle;
        }

        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining > 0 {
            return TickOutcome::Running {
                seconds_remaining: self.seconds_remaining,
            };
        }

        self.phase = AttemptPhase::Expired;
        if self.is_complete() {
            TickOutcome::ExpiredComplete
        } else {
            TickOutcome::ExpiredIncomplete
        }
    }

    /// Whether a submission may be initiated right now.
    ///
    /// Always possible in `InProgress`; from `Expired` only when every
    /// question is answered (an incomplete expired attempt stays where it
    /// is until the view is torn down).
    #[must_use]
    pub fn can_submit(&self) -> bool {
        if self.submitting {
            return false;
        }
        match self.phase {
            AttemptPhase::InProgress => true,
            AttemptPhase::Expired => self.is_complete(),
            AttemptPhase::NotStarted | AttemptPhase::Submitted => false,
        }
    }

    /// Mark a submission as in flight and expose the answers to send.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::SubmissionInFlight` if one is already pending
    /// and `AttemptError::NotSubmittable` when `can_submit` is false.
    pub fn begin_submission(&mut self) -> Result<&[Option<usize>], AttemptError> {
        if self.submitting {
            return Err(AttemptError::SubmissionInFlight);
        }
        if !self.can_submit() {
            return Err(AttemptError::NotSubmittable);
        }
        self.submitting = true;
        Ok(&self.answers)
    }

    /// Record a failed submission round-trip.
    ///
    /// The phase is left untouched (`InProgress` or `Expired`), so the
    /// attempt can be retried without re-answering. No local score is ever
    /// fabricated.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NoSubmissionInFlight` if nothing was pending.
    pub fn submission_failed(&mut self) -> Result<(), AttemptError> {
        if !self.submitting {
            return Err(AttemptError::NoSubmissionInFlight);
        }
        self.submitting = false;
        Ok(())
    }

    /// Record the server's authoritative score and freeze the attempt.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NoSubmissionInFlight` if nothing was pending.
    pub fn complete_submission(
        &mut self,
        score: u32,
        now: DateTime<Utc>,
    ) -> Result<(), AttemptError> {
        if !self.submitting {
            return Err(AttemptError::NoSubmissionInFlight);
        }
        self.submitting = false;
        self.score = Some(score);
        self.submitted_at = Some(now);
        self.phase = AttemptPhase::Submitted;
        Ok(())
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    #[must_use]
    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    /// Server-provided score; present only once submitted.
    #[must_use]
    pub fn score(&self) -> Option<u32> {
        self.score
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, question: usize) -> Option<usize> {
        self.answers.get(question).copied().flatten()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.quiz.question_count()
    }

    /// True when every question has an answer.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answers.iter().all(Option::is_some)
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    /// Per-question correctness of the recorded answers, for the
    /// post-submission highlighting. `None` where a question was left
    /// unanswered. Display only: the score of record is the server's.
    #[must_use]
    pub fn correctness(&self) -> Vec<Option<bool>> {
        self.answers
            .iter()
            .zip(self.quiz.questions())
            .map(|(slot, question)| {
                slot.map(|index| question.options.get(index).is_some_and(|o| o.is_correct))
            })
            .collect()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, QuestionOption, QuizId};
    use crate::time::fixed_now;

    fn option(text: &str, is_correct: bool) -> QuestionOption {
        QuestionOption {
            text: text.to_string(),
            is_correct,
        }
    }

    fn two_question_quiz(time_limit_minutes: i64) -> Quiz {
        let questions = vec![
            Question {
                text: "First?".into(),
                options: vec![option("no", false), option("yes", true)],
            },
            Question {
                text: "Second?".into(),
                options: vec![option("yes", true), option("no", false)],
            },
        ];
        Quiz::new(QuizId::new(9), "Sample", "", time_limit_minutes, questions).unwrap()
    }

    #[test]
    fn confirming_start_arms_the_full_time_budget() {
        let mut attempt = Attempt::new(two_question_quiz(30));
        assert_eq!(attempt.phase(), AttemptPhase::NotStarted);

        let phase = attempt.start(fixed_now()).unwrap();
        assert_eq!(phase, AttemptPhase::InProgress);
        assert_eq!(attempt.seconds_remaining(), 1800);
        assert_eq!(attempt.started_at(), Some(fixed_now()));
    }

    #[test]
    fn starting_twice_is_rejected() {
        let mut attempt = Attempt::new(two_question_quiz(30));
        attempt.start(fixed_now()).unwrap();
        assert_eq!(attempt.start(fixed_now()).unwrap_err(), AttemptError::AlreadyStarted);
    }

    #[test]
    fn non_positive_time_limit_expires_at_start() {
        for limit in [0, -3] {
            let mut attempt = Attempt::new(two_question_quiz(limit));
            let phase = attempt.start(fixed_now()).unwrap();
            assert_eq!(phase, AttemptPhase::Expired);
            assert_eq!(attempt.seconds_remaining(), 0);
        }
    }

    #[test]
    fn answering_both_questions_and_submitting_yields_server_score() {
        let mut attempt = Attempt::new(two_question_quiz(30));
        attempt.start(fixed_now()).unwrap();

        attempt.select_answer(0, 1).unwrap();
        attempt.select_answer(1, 0).unwrap();
        assert!(attempt.is_complete());

        let sent = attempt.begin_submission().unwrap().to_vec();
        assert_eq!(sent, vec![Some(1), Some(0)]);
        attempt.complete_submission(2, fixed_now()).unwrap();

        assert_eq!(attempt.phase(), AttemptPhase::Submitted);
        assert_eq!(attempt.score(), Some(2));
    }

    #[test]
    fn answers_are_frozen_after_submission() {
        let mut attempt = Attempt::new(two_question_quiz(30));
        attempt.start(fixed_now()).unwrap();
        attempt.select_answer(0, 1).unwrap();
        attempt.select_answer(1, 0).unwrap();
        attempt.begin_submission().unwrap();
        attempt.complete_submission(2, fixed_now()).unwrap();

        assert_eq!(
            attempt.select_answer(0, 0).unwrap_err(),
            AttemptError::NotInProgress
        );
        assert_eq!(
            attempt.begin_submission().unwrap_err(),
            AttemptError::NotSubmittable
        );
        assert_eq!(attempt.answers(), &[Some(1), Some(0)]);
    }

    #[test]
    fn countdown_is_monotonic_and_clamps_at_zero() {
        let mut attempt = Attempt::new(two_question_quiz(1));
        attempt.start(fixed_now()).unwrap();

        let mut last = attempt.seconds_remaining();
        for _ in 0..59 {
            match attempt.tick() {
                TickOutcome::Running { seconds_remaining } => {
                    assert!(seconds_remaining < last);
                    last = seconds_remaining;
                }
                other => panic!("expected a running tick, got {other:?}"),
            }
        }

        assert_eq!(attempt.tick(), TickOutcome::ExpiredIncomplete);
        assert_eq!(attempt.seconds_remaining(), 0);
        assert_eq!(attempt.phase(), AttemptPhase::Expired);

        // Further ticks are no-ops and never push the counter negative.
        assert_eq!(attempt.tick(), TickOutcome::Idle);
        assert_eq!(attempt.seconds_remaining(), 0);
    }

    #[test]
    fn expiry_with_every_question_answered_requests_auto_submit() {
        let mut attempt = Attempt::new(two_question_quiz(1));
        attempt.start(fixed_now()).unwrap();
        attempt.select_answer(0, 0).unwrap();
        attempt.select_answer(1, 1).unwrap();

        for _ in 0..59 {
            attempt.tick();
        }
        assert_eq!(attempt.tick(), TickOutcome::ExpiredComplete);
        assert!(attempt.can_submit());
    }

    #[test]
    fn expiry_with_unanswered_questions_blocks_submission() {
        let mut attempt = Attempt::new(two_question_quiz(1));
        attempt.start(fixed_now()).unwrap();
        attempt.select_answer(0, 0).unwrap();

        for _ in 0..60 {
            attempt.tick();
        }
        assert_eq!(attempt.phase(), AttemptPhase::Expired);
        assert!(!attempt.can_submit());
        assert_eq!(
            attempt.begin_submission().unwrap_err(),
            AttemptError::NotSubmittable
        );
        assert_eq!(
            attempt.select_answer(1, 0).unwrap_err(),
            AttemptError::NotInProgress
        );
    }

    #[test]
    fn ticks_are_ignored_before_start_and_after_submission() {
        let mut attempt = Attempt::new(two_question_quiz(30));
        assert_eq!(attempt.tick(), TickOutcome::Idle);

        attempt.start(fixed_now()).unwrap();
        attempt.select_answer(0, 0).unwrap();
        attempt.select_answer(1, 0).unwrap();
        attempt.begin_submission().unwrap();

        // A tick racing the in-flight submission still decrements...
        assert!(matches!(attempt.tick(), TickOutcome::Running { .. }));

        // ...but once the response lands, later ticks change nothing.
        attempt.complete_submission(1, fixed_now()).unwrap();
        let frozen = attempt.seconds_remaining();
        assert_eq!(attempt.tick(), TickOutcome::Idle);
        assert_eq!(attempt.seconds_remaining(), frozen);
        assert_eq!(attempt.phase(), AttemptPhase::Submitted);
    }

    #[test]
    fn failed_submission_keeps_the_attempt_retryable() {
        let mut attempt = Attempt::new(two_question_quiz(30));
        attempt.start(fixed_now()).unwrap();
        attempt.select_answer(0, 1).unwrap();

        attempt.begin_submission().unwrap();
        attempt.submission_failed().unwrap();

        assert_eq!(attempt.phase(), AttemptPhase::InProgress);
        assert_eq!(attempt.answers(), &[Some(1), None]);
        assert_eq!(attempt.score(), None);

        // Retry succeeds without re-answering.
        attempt.select_answer(1, 0).unwrap();
        attempt.begin_submission().unwrap();
        attempt.complete_submission(1, fixed_now()).unwrap();
        assert_eq!(attempt.phase(), AttemptPhase::Submitted);
    }

    #[test]
    fn double_begin_submission_is_rejected() {
        let mut attempt = Attempt::new(two_question_quiz(30));
        attempt.start(fixed_now()).unwrap();
        attempt.begin_submission().unwrap();
        assert_eq!(
            attempt.begin_submission().unwrap_err(),
            AttemptError::SubmissionInFlight
        );
        assert_eq!(
            attempt.select_answer(0, 0).unwrap_err(),
            AttemptError::SubmissionInFlight
        );
    }

    #[test]
    fn completing_without_a_pending_submission_is_rejected() {
        let mut attempt = Attempt::new(two_question_quiz(30));
        attempt.start(fixed_now()).unwrap();
        assert_eq!(
            attempt.complete_submission(2, fixed_now()).unwrap_err(),
            AttemptError::NoSubmissionInFlight
        );
        assert_eq!(
            attempt.submission_failed().unwrap_err(),
            AttemptError::NoSubmissionInFlight
        );
    }

    #[test]
    fn moving_between_questions_never_loses_answers() {
        let mut attempt = Attempt::new(two_question_quiz(30));
        attempt.start(fixed_now()).unwrap();

        attempt.select_answer(1, 1).unwrap();
        attempt.select_answer(0, 0).unwrap();
        attempt.select_answer(0, 1).unwrap();

        assert_eq!(attempt.answer(0), Some(1));
        assert_eq!(attempt.answer(1), Some(1));
        assert_eq!(attempt.answered_count(), 2);
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let mut attempt = Attempt::new(two_question_quiz(30));
        attempt.start(fixed_now()).unwrap();
        assert_eq!(
            attempt.select_answer(5, 0).unwrap_err(),
            AttemptError::QuestionOutOfRange(5)
        );
        assert_eq!(
            attempt.select_answer(0, 9).unwrap_err(),
            AttemptError::OptionOutOfRange(9)
        );
    }

    #[test]
    fn completed_status_reconstructs_directly_into_submitted() {
        let attempt = Attempt::from_completed(two_question_quiz(30), 5, vec![Some(1), Some(0)]);
        assert_eq!(attempt.phase(), AttemptPhase::Submitted);
        assert_eq!(attempt.score(), Some(5));
        assert_eq!(attempt.seconds_remaining(), 0);
        assert_eq!(attempt.correctness(), vec![Some(true), Some(true)]);
    }

    #[test]
    fn reconstruction_narrows_malformed_server_answers() {
        // Too short, and with an out-of-range option index.
        let attempt = Attempt::from_completed(two_question_quiz(30), 1, vec![Some(7)]);
        assert_eq!(attempt.answers(), &[None, None]);

        // Too long: extra slots are dropped.
        let attempt =
            Attempt::from_completed(two_question_quiz(30), 1, vec![Some(0), Some(1), Some(0)]);
        assert_eq!(attempt.answers(), &[Some(0), Some(1)]);
    }

    #[test]
    fn correctness_marks_wrong_and_unanswered_slots() {
        let mut attempt = Attempt::new(two_question_quiz(30));
        attempt.start(fixed_now()).unwrap();
        attempt.select_answer(0, 0).unwrap();
        attempt.begin_submission().unwrap();
        attempt.complete_submission(0, fixed_now()).unwrap();

        assert_eq!(attempt.correctness(), vec![Some(false), None]);
    }
}
