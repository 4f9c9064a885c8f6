use dioxus::prelude::*;
use dioxus_router::Link;

use crate::routes::Route;

#[component]
pub fn UnauthorizedView() -> Element {
    rsx! {
        div { class: "page unauthorized-page",
            h2 { "Not allowed" }
            p { "Your account doesn't have access to that page." }
            Link { class: "btn btn-secondary", to: Route::Courses {}, "Back to courses" }
        }
    }
}
