use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use campus_core::model::Role;
use services::AuthError;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let auth = ctx.auth();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut message = use_signal(|| None::<&'static str>);
    let mut busy = use_signal(|| false);

    let on_submit = use_callback(move |()| {
        if busy() {
            return;
        }
        let auth = auth.clone();
        let email_value = email().trim().to_string();
        let password_value = password();
        spawn(async move {
            busy.set(true);
            match auth.login(&email_value, &password_value).await {
                // The landing page follows the signed-in role.
                Ok(Role::Admin) => {
                    let _ = navigator.replace(Route::Admin {});
                }
                Ok(Role::Student) => {
                    let _ = navigator.replace(Route::Courses {});
                }
                Err(AuthError::InvalidCredentials) => {
                    message.set(Some("Invalid email or password."));
                }
                Err(err) => {
                    log::warn!("sign-in failed: {err}");
                    message.set(Some("Sign-in failed. Please try again."));
                }
            }
            busy.set(false);
        });
    });

    rsx! {
        div { class: "page auth-page",
            form {
                class: "auth-form",
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    on_submit.call(());
                },
                h2 { "Sign in" }
                if let Some(text) = message() {
                    p { class: "form-error", "{text}" }
                }
                label { r#for: "login-email", "Email" }
                input {
                    id: "login-email",
                    r#type: "email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                label { r#for: "login-password", "Password" }
                input {
                    id: "login-password",
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Signing in..." } else { "Sign in" }
                }
                p { class: "auth-form__switch",
                    "No account yet? "
                    Link { to: Route::Register {}, "Register" }
                }
            }
        }
    }
}
