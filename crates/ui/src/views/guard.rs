use dioxus::prelude::*;
use dioxus_router::use_navigator;

use campus_core::guard::{RouteGuardDecision, evaluate};
use campus_core::model::Role;

use crate::context::AppContext;
use crate::routes::Route;

/// Rendered when a view learns mid-flight that its session died (a 401).
/// The gateway has already cleared the persisted session; this completes
/// the process-wide policy with the silent redirect to login.
#[component]
pub fn SessionExpiredRedirect() -> Element {
    let navigator = use_navigator();
    let _ = navigator.replace(Route::Login {});
    rsx! {}
}

/// Gate for protected views.
///
/// Re-evaluates the route guard on every render against a fresh session
/// read — never cached, so a sign-out or a 401 between navigations is
/// picked up. Redirects are silent: no banner, just navigation.
#[component]
pub fn Guarded(required_role: Option<Role>, children: Element) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let session = ctx.session().current();
    match evaluate(session.as_ref(), required_role) {
        RouteGuardDecision::Allow => rsx! {
            {children}
        },
        RouteGuardDecision::RedirectToLogin => {
            let _ = navigator.replace(Route::Login {});
            rsx! {}
        }
        RouteGuardDecision::RedirectToUnauthorized => {
            let _ = navigator.replace(Route::Unauthorized {});
            rsx! {}
        }
    }
}
