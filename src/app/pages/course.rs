//! Course detail page: lesson list with premium gating.

use dioxus::prelude::*;

use crate::app::api::{Api, HttpApi};
use crate::app::components::Layout;
use crate::app::guard::RequireAuth;
use crate::app::session::use_session;
use crate::app::subscription::resolve_premium;
use crate::app::Route;

#[component]
pub fn Course(id: String) -> Element {
    rsx! {
        RequireAuth {
            Layout {
                title: "Course".to_string(),
                nav_active: "home".to_string(),
                CourseDetail { id }
            }
        }
    }
}

#[component]
fn CourseDetail(id: String) -> Element {
    let session = use_session();

    let course_id = id.clone();
    let mut detail =
        use_resource(move || {
            let id = course_id.clone();
            async move { HttpApi.get_course(&id).await.ok() }
        });

    let premium = resolve_premium(session.user().as_ref(), None);

    let rendered = match detail.read().clone() {
        None => rsx! {
            article { aria_busy: "true", "Loading course…" }
        },
        Some(None) => rsx! {
            article { class: "fetch-error",
                p { "Couldn't load this course." }
                button {
                    class: "btn",
                    onclick: move |_| detail.restart(),
                    "Try again"
                }
            }
        },
        Some(Some(resp)) => rsx! {
            hgroup {
                h1 {
                    {resp.course.emoji.clone().unwrap_or_default()}
                    " {resp.course.title}"
                }
                p { "{resp.course.description}" }
            }
            section { id: "lessons",
                ul { class: "lesson-list",
                    for lesson in resp.lessons {
                        li { key: "{lesson.id}",
                            if lesson.is_premium && !premium {
                                div { class: "lesson-row locked",
                                    span { class: "lesson-title", "🔒 {lesson.title}" }
                                    Link {
                                        to: Route::Premium {},
                                        class: "btn btn-sm",
                                        "Unlock with Premium"
                                    }
                                }
                            } else {
                                Link {
                                    to: Route::Lesson { id: lesson.id.clone() },
                                    class: "lesson-row",
                                    span { class: "lesson-title", "{lesson.title}" }
                                    small { class: "text-muted", "+{lesson.xp_reward} XP" }
                                }
                            }
                        }
                    }
                }
            }
        },
    };
    rendered
}
