//! Login page: email/password sign-in plus configured social providers.
//!
//! Social sign-in is an OAuth redirect: the provider returns to this screen
//! with an `id_token` in the URL fragment, which the mount effect consumes
//! and exchanges through the session store.

use dioxus::prelude::*;

use crate::app::components::{ErrorAlert, Layout};
use crate::app::config;
use crate::app::guard::RedirectIfAuthenticated;
use crate::app::session::use_session;
use crate::app::Route;

#[component]
pub fn Login() -> Element {
    rsx! {
        RedirectIfAuthenticated {
            Layout {
                title: "Sign in".to_string(),
                nav_active: "login".to_string(),
                LoginForm {}
            }
        }
    }
}

#[component]
fn LoginForm() -> Element {
    let session = use_session();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    // Consume an OAuth return fragment, if one is present
    use_effect(move || {
        let Some(hash) = current_fragment() else {
            return;
        };
        let Some(ret) = oauth_return_from_fragment(&hash) else {
            return;
        };
        // Drop the fragment so a reload doesn't replay the sign-in
        clear_fragment();
        spawn(async move {
            let result = match ret.provider.as_str() {
                "google" => session.google_login(&ret.id_token).await,
                "apple" => session.apple_login(&ret.id_token, None).await,
                other => {
                    tracing::warn!("ignoring OAuth return for unknown provider {other}");
                    Ok(())
                }
            };
            if let Err(err) = result {
                error.set(Some(err.to_string()));
            }
        });
    });

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        busy.set(true);
        error.set(None);
        spawn(async move {
            let email_now = email.peek().clone();
            let password_now = password.peek().clone();
            if let Err(err) = session.login(&email_now, &password_now).await {
                error.set(Some(err.to_string()));
            }
            busy.set(false);
        });
    };

    rsx! {
        section { class: "auth-card",
            h1 { "Welcome back" }
            if let Some(message) = error() {
                ErrorAlert {
                    message,
                    on_dismiss: move |_| error.set(None),
                }
            }
            form { onsubmit: on_submit,
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
                        autocomplete: "current-password",
                        oninput: move |e| password.set(e.value()),
                    }
                }
                button {
                    r#type: "submit",
                    class: "btn btn-primary",
                    disabled: busy(),
                    if busy() { "Signing in…" } else { "Sign in" }
                }
            }
            SocialButtons { error }
            p { class: "auth-alt",
                "New to Bloom? "
                Link { to: Route::Register {}, "Create an account" }
            }
        }
    }
}

/// Sign-in buttons for whichever providers are configured. Renders nothing
/// when no client ids were baked into the build.
#[component]
fn SocialButtons(error: Signal<Option<String>>) -> Element {
    let google = config::google_client_id();
    let apple = config::apple_client_id();
    if google.is_none() && apple.is_none() {
        return rsx! {};
    }
    let mut error = error;

    rsx! {
        div { class: "social-login",
            if let Some(client_id) = google {
                button {
                    class: "btn btn-social",
                    onclick: move |_| {
                        if let Err(err) = begin_oauth("google", client_id) {
                            error.set(Some(err));
                        }
                    },
                    "Continue with Google"
                }
            }
            if let Some(client_id) = apple {
                button {
                    class: "btn btn-social",
                    onclick: move |_| {
                        if let Err(err) = begin_oauth("apple", client_id) {
                            error.set(Some(err));
                        }
                    },
                    "Continue with Apple"
                }
            }
        }
    }
}

/// An OAuth return carried in the URL fragment.
#[derive(Debug, PartialEq, Eq)]
struct OauthReturn {
    provider: String,
    id_token: String,
}

/// Extract the provider state and id_token from an OAuth return fragment.
fn oauth_return_from_fragment(hash: &str) -> Option<OauthReturn> {
    let frag = hash.strip_prefix('#').unwrap_or(hash);
    let mut provider = None;
    let mut id_token = None;
    for pair in frag.split('&') {
        if let Some(v) = pair.strip_prefix("id_token=") {
            id_token = Some(v.to_string());
        } else if let Some(v) = pair.strip_prefix("state=") {
            provider = Some(v.to_string());
        }
    }
    Some(OauthReturn {
        provider: provider?,
        id_token: id_token?,
    })
}

/// Kick off an OAuth id_token flow; the provider returns to `/login` with
/// the token in the URL fragment.
#[cfg(target_arch = "wasm32")]
fn begin_oauth(provider: &str, client_id: &str) -> Result<(), String> {
    use rand::distributions::Alphanumeric;
    use rand::Rng;

    let window = web_sys::window().ok_or("no window")?;
    let origin = window.location().origin().map_err(|_| "no origin")?;
    let redirect = format!("{origin}/login");
    let nonce: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();

    let endpoint = match provider {
        "google" => "https://accounts.google.com/o/oauth2/v2/auth",
        "apple" => "https://appleid.apple.com/auth/authorize",
        other => return Err(format!("unknown provider {other}")),
    };
    let url = format!(
        "{endpoint}?client_id={}&redirect_uri={}&response_type=id_token&response_mode=fragment&scope=openid%20email%20profile&state={provider}&nonce={nonce}",
        urlencoding::encode(client_id),
        urlencoding::encode(&redirect),
    );
    window
        .location()
        .set_href(&url)
        .map_err(|_| "navigation failed".to_string())
}

/// SSR stub - social sign-in needs a browser
#[cfg(not(target_arch = "wasm32"))]
fn begin_oauth(provider: &str, _client_id: &str) -> Result<(), String> {
    Err(format!("{provider} sign-in is only available in browser"))
}

#[cfg(target_arch = "wasm32")]
fn current_fragment() -> Option<String> {
    web_sys::window()?
        .location()
        .hash()
        .ok()
        .filter(|h| !h.is_empty())
}

#[cfg(not(target_arch = "wasm32"))]
fn current_fragment() -> Option<String> {
    None
}

/// Clear the URL fragment without a navigation.
#[cfg(target_arch = "wasm32")]
fn clear_fragment() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let (Ok(path), Ok(history)) = (window.location().pathname(), window.history()) else {
        return;
    };
    let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&path));
}

#[cfg(not(target_arch = "wasm32"))]
fn clear_fragment() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_parsing_extracts_provider_and_token() {
        let ret = oauth_return_from_fragment("#state=google&id_token=abc.def.ghi")
            .expect("should parse");
        assert_eq!(ret.provider, "google");
        assert_eq!(ret.id_token, "abc.def.ghi");
    }

    #[test]
    fn fragment_order_does_not_matter() {
        let ret = oauth_return_from_fragment("id_token=tok&foo=bar&state=apple")
            .expect("should parse");
        assert_eq!(ret.provider, "apple");
        assert_eq!(ret.id_token, "tok");
    }

    #[test]
    fn fragment_without_token_is_ignored() {
        assert_eq!(oauth_return_from_fragment("#state=google"), None);
        assert_eq!(oauth_return_from_fragment("#id_token=tok"), None);
        assert_eq!(oauth_return_from_fragment(""), None);
    }
}
