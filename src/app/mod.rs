//! Dioxus application entry point.
//!
//! This module provides the root App component: context providers for the
//! session and theme, plus the client-side router.

use dioxus::prelude::*;

pub mod achievements;
pub mod api;
pub mod components;
pub mod config;
pub mod guard;
pub mod metrics;
pub mod pages;
pub mod session;
pub mod subscription;
pub mod theme;
pub mod tokens;

use pages::{Course, Home, Lesson, Login, Premium, Profile, Register};
use session::use_session_provider;
use theme::use_theme_provider;

/// Root app component with routing
#[component]
pub fn App() -> Element {
    // Initialize session context at app root (resolves stored credentials
    // once per process)
    use_session_provider();

    // Initialize theme context at app root (handles localStorage + DOM class)
    use_theme_provider();

    rsx! {
        Router::<Route> {}
    }
}

/// Application routes
#[derive(Clone, Routable, Debug, PartialEq)]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/login")]
    Login {},
    #[route("/register")]
    Register {},
    #[route("/course/:id")]
    Course { id: String },
    #[route("/lesson/:id")]
    Lesson { id: String },
    #[route("/premium")]
    Premium {},
    #[route("/profile")]
    Profile {},
}
