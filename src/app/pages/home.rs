//! Home page: the course catalog.

use dioxus::prelude::*;

use crate::app::api::{Api, HttpApi};
use crate::app::components::Layout;
use crate::app::guard::RequireAuth;
use crate::app::session::use_session;
use crate::app::subscription::resolve_premium;
use crate::app::Route;

#[component]
pub fn Home() -> Element {
    rsx! {
        RequireAuth {
            Layout {
                title: "Learn".to_string(),
                nav_active: "home".to_string(),
                CourseCatalog {}
            }
        }
    }
}

#[component]
fn CourseCatalog() -> Element {
    let session = use_session();

    let mut courses = use_resource(|| async { HttpApi.get_courses().await.ok() });

    let user = session.user();
    let greeting = user
        .as_ref()
        .map(|u| format!("Welcome back, {}!", u.name))
        .unwrap_or_else(|| "Welcome back!".to_string());
    // Premium gating on this screen only needs the session snapshot
    let premium = resolve_premium(user.as_ref(), None);

    let listing = courses.read().clone();
    let content = match listing {
        None => rsx! {
            article { aria_busy: "true", "Loading courses…" }
        },
        Some(None) => rsx! {
            article { class: "fetch-error",
                p { "Couldn't load your courses." }
                button {
                    class: "btn",
                    onclick: move |_| courses.restart(),
                    "Try again"
                }
            }
        },
        Some(Some(resp)) => rsx! {
            div { class: "course-grid",
                for course in resp.courses {
                    Link {
                        key: "{course.id}",
                        to: Route::Course { id: course.id.clone() },
                        class: "course-card",
                        span { class: "course-emoji",
                            {course.emoji.clone().unwrap_or_else(|| "📚".to_string())}
                        }
                        h3 { "{course.title}" }
                        p { class: "text-muted", "{course.description}" }
                        small { "{course.lesson_count} lessons" }
                        if course.is_premium && !premium {
                            span { class: "badge badge-premium", "🔒 Premium" }
                        }
                    }
                }
            }
        },
    };

    rsx! {
        h1 { "{greeting}" }
        section { id: "courses",
            hgroup {
                h2 { "Courses" }
                p { "Pick up where you left off" }
            }
            {content}
        }
    }
}
