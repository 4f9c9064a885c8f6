use dioxus::prelude::*;
use dioxus_router::Link;

use campus_core::model::{CourseId, Role};

use services::{ApiError, CourseServiceError};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{
    Guarded, SessionExpiredRedirect, ViewError, ViewState, view_state_from_resource,
};
use crate::vm::markdown_to_html;

fn map_course_error(err: &CourseServiceError) -> ViewError {
    match err {
        CourseServiceError::Api(ApiError::Unauthorized) => ViewError::SessionExpired,
        _ => ViewError::LoadFailed,
    }
}

#[derive(Clone, Debug, PartialEq)]
struct CourseDetail {
    title: String,
    description_html: String,
    quizzes: Vec<(u64, String)>,
}

#[component]
pub fn CourseView(course_id: u64) -> Element {
    rsx! {
        Guarded { required_role: Some(Role::Student),
            CourseBody { course_id }
        }
    }
}

#[component]
fn CourseBody(course_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let courses = ctx.courses();
    let course_id = CourseId::new(course_id);

    let resource = use_resource(move || {
        let courses = courses.clone();
        async move {
            let course = courses
                .get_course(course_id)
                .await
                .map_err(|err| map_course_error(&err))?;
            let quizzes = course
                .quiz_ids
                .iter()
                .enumerate()
                .map(|(index, quiz_id)| (quiz_id.value(), format!("Quiz {}", index + 1)))
                .collect();
            Ok::<_, ViewError>(CourseDetail {
                title: course.title,
                description_html: markdown_to_html(&course.description),
                quizzes,
            })
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
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
                ViewState::Ready(detail) => rsx! {
                    h2 { "{detail.title}" }
                    div { class: "markdown", dangerous_inner_html: "{detail.description_html}" }
                    if detail.quizzes.is_empty() {
                        p { "This course has no quizzes yet." }
                    } else {
                        h3 { "Quizzes" }
                        ul { class: "quiz-list",
                            for (quiz_id, label) in detail.quizzes {
                                li {
                                    Link { class: "quiz-list__link", to: Route::Quiz { quiz_id },
                                        "{label}"
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
