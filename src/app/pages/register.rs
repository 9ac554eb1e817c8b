//! Registration page with local form validation.

use dioxus::prelude::*;

use crate::app::components::{ErrorAlert, Layout};
use crate::app::guard::RedirectIfAuthenticated;
use crate::app::session::use_session;
use crate::app::Route;

#[component]
pub fn Register() -> Element {
    rsx! {
        RedirectIfAuthenticated {
            Layout {
                title: "Create account".to_string(),
                nav_active: "register".to_string(),
                RegisterForm {}
            }
        }
    }
}

#[component]
fn RegisterForm() -> Element {
    let session = use_session();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        let name_now = name.peek().trim().to_string();
        let email_now = email.peek().clone();
        let password_now = password.peek().clone();
        if let Some(message) = validate(&name_now, &email_now, &password_now) {
            error.set(Some(message));
            return;
        }
        busy.set(true);
        error.set(None);
        spawn(async move {
            if let Err(err) = session.register(&name_now, &email_now, &password_now).await {
                error.set(Some(err.to_string()));
            }
            busy.set(false);
        });
    };

    rsx! {
        section { class: "auth-card",
            h1 { "Start learning" }
            if let Some(message) = error() {
                ErrorAlert {
                    message,
                    on_dismiss: move |_| error.set(None),
                }
            }
            form { onsubmit: on_submit,
                label { "Name"
                    input {
                        r#type: "text",
                        value: "{name}",
                        autocomplete: "name",
                        oninput: move |e| name.set(e.value()),
                    }
                }
                label { "Email"
                    input {
                        r#type: "email",
                        value: "{email}",
                        autocomplete: "email",
                        oninput: move |e| email.set(e.value()),
                    }
                }
                label { "Password"
                    input {
                        r#type: "password",
                        value: "{password}",
                        autocomplete: "new-password",
                        oninput: move |e| password.set(e.value()),
                    }
                }
                button {
                    r#type: "submit",
                    class: "btn btn-primary",
                    disabled: busy(),
                    if busy() { "Creating account…" } else { "Create account" }
                }
            }
            p { class: "auth-alt",
                "Already have an account? "
                Link { to: Route::Login {}, "Sign in" }
            }
        }
    }
}

/// Local validation before hitting the API.
fn validate(name: &str, email: &str, password: &str) -> Option<String> {
    if name.is_empty() {
        return Some("Please tell us your name".to_string());
    }
    if !is_valid_email(email) {
        return Some("That email address doesn't look right".to_string());
    }
    if password.len() < 8 {
        return Some("Password must be at least 8 characters".to_string());
    }
    None
}

fn is_valid_email(email: &str) -> bool {
    regex::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
        .map(|re| re.is_match(email))
        .unwrap_or(false)
}
