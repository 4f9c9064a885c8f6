use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use campus_core::model::Role;
use services::Registration;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn RegisterView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let auth = ctx.auth();

    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut message = use_signal(|| None::<&'static str>);
    let mut busy = use_signal(|| false);

    let on_submit = use_callback(move |()| {
        if busy() {
            return;
        }
        let name_value = name().trim().to_string();
        let email_value = email().trim().to_string();
        let password_value = password();
        if name_value.is_empty() || email_value.is_empty() || password_value.is_empty() {
            message.set(Some("All fields are required."));
            return;
        }

        let auth = auth.clone();
        spawn(async move {
            busy.set(true);
            let registration = Registration {
                name: name_value,
                email: email_value,
                password: password_value,
            };
            match auth.register(registration).await {
                Ok(Role::Admin) => {
                    let _ = navigator.replace(Route::Admin {});
                }
                Ok(Role::Student) => {
                    let _ = navigator.replace(Route::Courses {});
                }
                Err(err) => {
                    log::warn!("registration failed: {err}");
                    message.set(Some("Registration failed. Please try again."));
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
                h2 { "Create an account" }
                if let Some(text) = message() {
                    p { class: "form-error", "{text}" }
                }
                label { r#for: "register-name", "Name" }
                input {
                    id: "register-name",
                    value: "{name}",
                    oninput: move |evt| name.set(evt.value()),
                }
                label { r#for: "register-email", "Email" }
                input {
                    id: "register-email",
                    r#type: "email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                label { r#for: "register-password", "Password" }
                input {
                    id: "register-password",
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Creating..." } else { "Register" }
                }
                p { class: "auth-form__switch",
                    "Already have an account? "
                    Link { to: Route::Login {}, "Sign in" }
                }
            }
        }
    }
}
