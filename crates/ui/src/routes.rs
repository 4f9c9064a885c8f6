use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};

use campus_core::model::Role;

use crate::context::AppContext;
use crate::views::{
    AdminView, CourseView, CoursesView, LoginView, QuizView, RegisterView, UnauthorizedView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/login", LoginView)] Login {},
    #[route("/register", RegisterView)] Register {},
    #[route("/unauthorized", UnauthorizedView)] Unauthorized {},
    #[layout(Shell)]
        #[route("/", CoursesView)] Courses {},
        #[route("/courses/:course_id", CourseView)] Course { course_id: u64 },
        #[route("/quizzes/:quiz_id", QuizView)] Quiz { quiz_id: u64 },
        #[route("/admin", AdminView)] Admin {},
}

#[component]
fn Shell() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let auth = ctx.auth();

    // Fresh read on every render; a 401 in-flight clears this between
    // navigations and the guards below each view pick it up.
    let session = ctx.session().current();
    let is_admin = session.as_ref().is_some_and(|s| s.role() == Role::Admin);

    let on_sign_out = use_callback(move |()| {
        let auth = auth.clone();
        spawn(async move {
            if let Err(err) = auth.logout().await {
                log::warn!("sign-out failed: {err}");
            }
            let _ = navigator.replace(Route::Login {});
        });
    });

    rsx! {
        div { class: "app",
            header { class: "topbar",
                h1 { class: "topbar__brand", "Campus" }
                nav { class: "topbar__nav",
                    Link { to: Route::Courses {}, "Courses" }
                    if is_admin {
                        Link { to: Route::Admin {}, "Admin" }
                    }
                }
                if let Some(session) = session {
                    div { class: "topbar__user",
                        span { "{session.user().name()}" }
                        button {
                            class: "btn btn-ghost",
                            r#type: "button",
                            onclick: move |_| on_sign_out.call(()),
                            "Sign out"
                        }
                    }
                }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
