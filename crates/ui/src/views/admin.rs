use dioxus::prelude::*;

use campus_core::model::Role;

use services::{ApiError, CourseServiceError};

use crate::context::AppContext;
use crate::views::{
    Guarded, SessionExpiredRedirect, ViewError, ViewState, view_state_from_resource,
};

#[derive(Clone, Debug, PartialEq)]
struct AdminOverview {
    course_count: usize,
    quiz_count: usize,
}

#[component]
pub fn AdminView() -> Element {
    rsx! {
        Guarded { required_role: Some(Role::Admin),
            AdminBody {}
        }
    }
}

#[component]
fn AdminBody() -> Element {
    let ctx = use_context::<AppContext>();
    let courses = ctx.courses();

    let resource = use_resource(move || {
        let courses = courses.clone();
        async move {
            let listed = courses.list_courses().await.map_err(|err| match err {
                CourseServiceError::Api(ApiError::Unauthorized) => ViewError::SessionExpired,
                _ => ViewError::LoadFailed,
            })?;
            let quiz_count = listed.iter().map(|course| course.quiz_ids.len()).sum();
            Ok::<_, ViewError>(AdminOverview {
                course_count: listed.len(),
                quiz_count,
            })
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Administration" }
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
                        p { "{err.message()}" }
                    }
                },
                ViewState::Ready(overview) => rsx! {
                    ul { class: "admin-stats",
                        li { "Courses: {overview.course_count}" }
                        li { "Quizzes: {overview.quiz_count}" }
                    }
                    p { "Course and quiz management happens in the backend console." }
                },
            }
        }
    }
}
