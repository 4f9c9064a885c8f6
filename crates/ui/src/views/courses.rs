use dioxus::prelude::*;
use dioxus_router::Link;

use campus_core::model::Role;

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
struct CourseCard {
    course_id: u64,
    title: String,
    description_html: String,
    quiz_label: String,
}

#[component]
pub fn CoursesView() -> Element {
    rsx! {
        Guarded { required_role: Some(Role::Student),
            CourseList {}
        }
    }
}

#[component]
fn CourseList() -> Element {
    let ctx = use_context::<AppContext>();
    let courses = ctx.courses();

    let resource = use_resource(move || {
        let courses = courses.clone();
        async move {
            let listed = courses
                .list_courses()
                .await
                .map_err(|err| map_course_error(&err))?;
            let cards = listed
                .into_iter()
                .map(|course| CourseCard {
                    course_id: course.id.value(),
                    title: course.title,
                    description_html: markdown_to_html(&course.description),
                    quiz_label: match course.quiz_ids.len() {
                        1 => "1 quiz".to_string(),
                        count => format!("{count} quizzes"),
                    },
                })
                .collect::<Vec<_>>();
            Ok::<_, ViewError>(cards)
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Courses" }
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
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        p { "No courses available yet." }
                    } else {
                        ul { class: "course-list",
                            for card in cards {
                                li { class: "course-card",
                                    Link { to: Route::Course { course_id: card.course_id },
                                        h3 { "{card.title}" }
                                    }
                                    div { class: "markdown course-card__description",
                                        dangerous_inner_html: "{card.description_html}"
                                    }
                                    span { class: "course-card__meta", "{card.quiz_label}" }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
