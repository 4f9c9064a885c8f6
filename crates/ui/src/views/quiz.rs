use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use campus_core::attempt::{AttemptPhase, TickOutcome};
use campus_core::model::{QuizId, Role};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{
    Guarded, SessionExpiredRedirect, ViewError, ViewState, view_state_from_resource,
};
use crate::vm::{AttemptIntent, AttemptVm, SubmitDisposition, load_attempt, markdown_to_html};

fn format_timer(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[component]
pub fn QuizView(quiz_id: u64) -> Element {
    rsx! {
        Guarded { required_role: Some(Role::Student),
            AttemptScreen { quiz_id }
        }
    }
}

#[component]
fn AttemptScreen(quiz_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let attempt_loop = ctx.attempt_loop();
    let quiz_id = QuizId::new(quiz_id);

    let vm = use_signal(|| None::<AttemptVm>);
    let error = use_signal(|| None::<ViewError>);
    let timer = use_signal(|| None::<Task>);

    let attempt_loop_for_resource = attempt_loop.clone();
    let resource = use_resource(move || {
        let attempt_loop = attempt_loop_for_resource.clone();
        let mut vm = vm;
        async move {
            let loaded = load_attempt(&attempt_loop, quiz_id).await?;
            vm.set(Some(loaded));
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    // The countdown is the only background task this view owns. It is
    // cancelled on unmount and on every exit from InProgress; ticks re-check
    // the phase through the machine, so one that races a resolving
    // submission lands as a no-op.
    let stop_timer = use_callback(move |()| {
        let mut timer = timer;
        if let Some(task) = timer.write().take() {
            task.cancel();
        }
    });

    use_drop(move || {
        let mut timer = timer;
        if let Some(task) = timer.write().take() {
            task.cancel();
        }
    });

    let attempt_loop_for_submit = attempt_loop.clone();
    let do_submit = use_callback(move |()| {
        let attempt_loop = attempt_loop_for_submit.clone();
        let mut error = error;
        let mut vm = vm;
        spawn(async move {
            // The attempt never leaves its signal: begin and settle each
            // take a short borrow, and ticks keep landing in between.
            let payload = {
                let mut guard = vm.write();
                guard.as_mut().map(|v| v.begin_submit(&attempt_loop))
            };
            let Some(Ok((quiz_id, wire))) = payload else {
                return;
            };

            let outcome = attempt_loop.send_answers(quiz_id, &wire).await;

            let settled = {
                let mut guard = vm.write();
                guard
                    .as_mut()
                    .map(|v| v.settle_submit(&attempt_loop, outcome))
            };
            match settled {
                Some(Ok(_)) => {
                    error.set(None);
                    stop_timer.call(());
                }
                Some(Err(err)) => error.set(Some(err)),
                None => {}
            }
        });
    });

    let start_timer = use_callback(move |()| {
        // Idempotent: a second start while one countdown is live is a no-op.
        if timer.read().is_some() {
            return;
        }
        let mut vm = vm;
        let mut timer_for_task = timer;
        let task = spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                let outcome = {
                    let mut guard = vm.write();
                    guard.as_mut().map(AttemptVm::tick)
                };
                match outcome {
                    // View torn down under us; nothing left to drive.
                    None => break,
                    Some(TickOutcome::Running { .. }) => {}
                    Some(TickOutcome::ExpiredComplete) => {
                        // Every question answered at the moment of expiry:
                        // the one path that submits automatically.
                        do_submit.call(());
                        break;
                    }
                    Some(TickOutcome::ExpiredIncomplete | TickOutcome::Idle) => break,
                }
            }
            timer_for_task.write().take();
        });
        let mut timer = timer;
        timer.set(Some(task));
    });

    let attempt_loop_for_intents = attempt_loop.clone();
    let dispatch = use_callback(move |intent: AttemptIntent| {
        let mut vm = vm;
        match intent {
            AttemptIntent::Start => {
                let started = {
                    let mut guard = vm.write();
                    guard.as_mut().map(|v| v.start(&attempt_loop_for_intents))
                };
                if let Some(Ok(AttemptPhase::InProgress)) = started {
                    start_timer.call(());
                }
            }
            AttemptIntent::Select { question, option } => {
                if let Some(v) = vm.write().as_mut() {
                    // Rejected edits (expired, racing submission) are simply
                    // dropped; the controls are disabled in those phases.
                    let _ = v.select(question, option);
                }
            }
            AttemptIntent::GoTo { question } => {
                if let Some(v) = vm.write().as_mut() {
                    v.go_to(question);
                }
            }
            AttemptIntent::Submit => {
                let disposition = {
                    let mut guard = vm.write();
                    guard.as_mut().map(AttemptVm::request_submit)
                };
                if disposition == Some(SubmitDisposition::Send) {
                    do_submit.call(());
                }
            }
            AttemptIntent::ConfirmSubmit => do_submit.call(()),
            AttemptIntent::CancelSubmit => {
                if let Some(v) = vm.write().as_mut() {
                    v.cancel_submit();
                }
            }
        }
    });

    let error_state = *error.read();

    rsx! {
        div { class: "page quiz-page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    if err == ViewError::SessionExpired {
                        SessionExpiredRedirect {}
                    } else {
                        div { class: "inline-error",
                            p { "{err.message()}" }
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| {
                                    let mut resource = resource;
                                    resource.restart();
                                },
                                "Retry"
                            }
                        }
                    }
                },
                ViewState::Ready(()) => rsx! {
                    AttemptBody { vm, error: error_state, dispatch }
                },
            }
        }
    }
}

#[component]
fn AttemptBody(
    vm: Signal<Option<AttemptVm>>,
    error: Option<ViewError>,
    dispatch: Callback<AttemptIntent>,
) -> Element {
    if error == Some(ViewError::SessionExpired) {
        return rsx! {
            SessionExpiredRedirect {}
        };
    }

    let vm_guard = vm.read();
    let Some(vm_value) = vm_guard.as_ref() else {
        return rsx! {
            p { "Loading..." }
        };
    };

    let title = vm_value.attempt().quiz().title().to_string();
    let phase = vm_value.phase();
    let submitting = vm_value.attempt().is_submitting();
    let error_message = error.map(ViewError::message);
    drop(vm_guard);

    rsx! {
        header { class: "quiz-header",
            h2 { "{title}" }
        }
        if let Some(message) = error_message {
            div { class: "inline-error",
                p { "{message}" }
                if phase != AttemptPhase::Submitted {
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| dispatch.call(AttemptIntent::Submit),
                        "Retry submission"
                    }
                }
            }
        }
        match phase {
            AttemptPhase::NotStarted => rsx! {
                StartConfirmation { vm, dispatch }
            },
            AttemptPhase::InProgress | AttemptPhase::Expired => rsx! {
                QuestionPanel { vm, dispatch, submitting }
            },
            AttemptPhase::Submitted => rsx! {
                ResultPanel { vm }
            },
        }
    }
}

#[component]
fn StartConfirmation(vm: Signal<Option<AttemptVm>>, dispatch: Callback<AttemptIntent>) -> Element {
    let navigator = use_navigator();
    let vm_guard = vm.read();
    let Some(vm_value) = vm_guard.as_ref() else {
        return rsx! {};
    };
    let quiz = vm_value.attempt().quiz();
    let minutes = quiz.time_limit_minutes().to_string();
    let questions = quiz.question_count().to_string();
    let description_html =
        (!quiz.description().is_empty()).then(|| markdown_to_html(quiz.description()));
    drop(vm_guard);

    rsx! {
        section { class: "start-confirm",
            if let Some(html) = description_html {
                div { class: "markdown", dangerous_inner_html: "{html}" }
            }
            p {
                "This quiz has {questions} questions and a time limit of "
                strong { "{minutes} minutes" }
                ". The timer starts as soon as you begin and cannot be paused."
            }
            div { class: "start-confirm__actions",
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| dispatch.call(AttemptIntent::Start),
                    "Start quiz"
                }
                // Declining leaves nothing behind: the attempt is dropped
                // with the view and no timer was ever started.
                button {
                    class: "btn btn-ghost",
                    r#type: "button",
                    onclick: move |_| {
                        let _ = navigator.replace(Route::Courses {});
                    },
                    "Not now"
                }
            }
        }
    }
}

#[derive(Clone, PartialEq)]
struct OptionRow {
    index: usize,
    text: String,
    selected: bool,
}

#[component]
fn QuestionPanel(
    vm: Signal<Option<AttemptVm>>,
    dispatch: Callback<AttemptIntent>,
    submitting: bool,
) -> Element {
    let vm_guard = vm.read();
    let Some(vm_value) = vm_guard.as_ref() else {
        return rsx! {};
    };
    let attempt = vm_value.attempt();
    let quiz = attempt.quiz();
    let expired = vm_value.phase() == AttemptPhase::Expired;
    let editable = vm_value.phase() == AttemptPhase::InProgress && !submitting;

    let index = vm_value.current_question();
    let question = &quiz.questions()[index];
    let question_html = markdown_to_html(&question.text);
    let selected = attempt.answer(index);
    let option_rows: Vec<OptionRow> = question
        .options
        .iter()
        .enumerate()
        .map(|(option_index, option)| OptionRow {
            index: option_index,
            text: option.text.clone(),
            selected: selected == Some(option_index),
        })
        .collect();
    let nav_labels: Vec<(usize, String)> = (0..quiz.question_count())
        .map(|nav_index| (nav_index, (nav_index + 1).to_string()))
        .collect();

    let total = attempt.question_count();
    let progress_label = format!("Answered {} / {total}", attempt.answered_count());
    let timer_label = format!("Time left: {}", format_timer(attempt.seconds_remaining()));
    let can_submit = attempt.can_submit();
    let confirming = vm_value.confirming_submit();
    let submit_label = if submitting { "Submitting..." } else { "Submit quiz" };
    let prev_question = index.saturating_sub(1);
    let next_question = index + 1;
    drop(vm_guard);

    rsx! {
        section { class: "attempt",
            div { class: "attempt-status",
                span { class: "attempt-status__progress", "{progress_label}" }
                if expired {
                    span { class: "attempt-status__timer attempt-status__timer--expired", "Time is up" }
                } else {
                    span { class: "attempt-status__timer", "{timer_label}" }
                }
            }

            nav { class: "question-nav",
                for (nav_index, label) in nav_labels {
                    button {
                        class: if nav_index == index { "question-nav__dot question-nav__dot--current" } else { "question-nav__dot" },
                        r#type: "button",
                        onclick: move |_| dispatch.call(AttemptIntent::GoTo { question: nav_index }),
                        "{label}"
                    }
                }
            }

            div { class: "question",
                div { class: "markdown question__text", dangerous_inner_html: "{question_html}" }
                ul { class: "options",
                    for row in option_rows {
                        li {
                            button {
                                class: if row.selected { "option option--selected" } else { "option" },
                                r#type: "button",
                                disabled: !editable,
                                onclick: move |_| dispatch.call(AttemptIntent::Select {
                                    question: index,
                                    option: row.index,
                                }),
                                "{row.text}"
                            }
                        }
                    }
                }
            }

            div { class: "attempt-controls",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    disabled: index == 0,
                    onclick: move |_| dispatch.call(AttemptIntent::GoTo { question: prev_question }),
                    "Previous"
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    disabled: next_question >= total,
                    onclick: move |_| dispatch.call(AttemptIntent::GoTo { question: next_question }),
                    "Next"
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: !can_submit || submitting,
                    onclick: move |_| dispatch.call(AttemptIntent::Submit),
                    "{submit_label}"
                }
            }

            if expired && !can_submit {
                p { class: "attempt-note",
                    "Time ran out with unanswered questions. This attempt can no longer be submitted."
                }
            }

            if confirming {
                div { class: "confirm-box",
                    p { "You still have unanswered questions. Submit anyway?" }
                    div { class: "confirm-box__actions",
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            onclick: move |_| dispatch.call(AttemptIntent::ConfirmSubmit),
                            "Submit anyway"
                        }
                        button {
                            class: "btn btn-ghost",
                            r#type: "button",
                            onclick: move |_| dispatch.call(AttemptIntent::CancelSubmit),
                            "Keep answering"
                        }
                    }
                }
            }
        }
    }
}

#[derive(Clone, PartialEq)]
struct ReviewRow {
    class: &'static str,
    question_html: String,
    answer_line: String,
}

#[component]
fn ResultPanel(vm: Signal<Option<AttemptVm>>) -> Element {
    let vm_guard = vm.read();
    let Some(vm_value) = vm_guard.as_ref() else {
        return rsx! {};
    };
    let attempt = vm_value.attempt();
    let quiz = attempt.quiz();
    let score_label = format!(
        "Score: {} / {}",
        attempt.score().unwrap_or(0),
        attempt.question_count()
    );
    let correctness = attempt.correctness();

    let rows: Vec<ReviewRow> = quiz
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let class = match correctness.get(index).copied().flatten() {
                Some(true) => "result-review__item result-review__item--correct",
                Some(false) => "result-review__item result-review__item--wrong",
                None => "result-review__item result-review__item--skipped",
            };
            let chosen = attempt
                .answer(index)
                .and_then(|option| question.options.get(option))
                .map_or_else(
                    || "Not answered".to_string(),
                    |option| format!("Your answer: {}", option.text),
                );
            let correct = question
                .options
                .iter()
                .find(|option| option.is_correct)
                .map(|option| format!(" · Correct: {}", option.text))
                .unwrap_or_default();
            ReviewRow {
                class,
                question_html: markdown_to_html(&question.text),
                answer_line: format!("{chosen}{correct}"),
            }
        })
        .collect();
    drop(vm_guard);

    rsx! {
        section { class: "result",
            h3 { class: "result__score", "{score_label}" }
            ol { class: "result-review",
                for row in rows {
                    li { class: "{row.class}",
                        div { class: "markdown", dangerous_inner_html: "{row.question_html}" }
                        p { class: "result-review__answer", "{row.answer_line}" }
                    }
                }
            }
            Link { class: "btn btn-secondary", to: Route::Courses {}, "Back to courses" }
        }
    }
}
