//! Route guards gating screens on session phase.
//!
//! Evaluated on every render. While the session is resolving nothing but a
//! busy placeholder renders; an anonymous visit to a protected screen is
//! redirected to the login screen, deliberately discarding the originally
//! requested location.

use dioxus::prelude::*;

use super::session::{use_session, SessionPhase};
use super::Route;

/// Wrap protected page content; redirects anonymous visitors to Login.
#[component]
pub fn RequireAuth(children: Element) -> Element {
    let session = use_session();

    use_effect(move || {
        if session.phase() == SessionPhase::Anonymous {
            navigator().replace(Route::Login {});
        }
    });

    match session.phase() {
        SessionPhase::Resolving => rsx! {
            article { aria_busy: "true", class: "guard-loading", "Loading…" }
        },
        SessionPhase::Anonymous => rsx! {},
        SessionPhase::Authenticated => rsx! {
            {children}
        },
    }
}

/// Symmetric guard for the login/register screens: an authenticated user is
/// sent to the home screen instead of seeing the form again.
#[component]
pub fn RedirectIfAuthenticated(children: Element) -> Element {
    let session = use_session();

    use_effect(move || {
        if session.phase() == SessionPhase::Authenticated {
            navigator().replace(Route::Home {});
        }
    });

    match session.phase() {
        SessionPhase::Resolving => rsx! {
            article { aria_busy: "true", class: "guard-loading", "Loading…" }
        },
        SessionPhase::Authenticated => rsx! {},
        SessionPhase::Anonymous => rsx! {
            {children}
        },
    }
}
