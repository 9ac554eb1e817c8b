//! Lesson page: content plus the completion action.

use dioxus::prelude::*;

use crate::app::api::{Api, HttpApi};
use crate::app::components::{ErrorAlert, Layout};
use crate::app::guard::RequireAuth;
use crate::app::session::use_session;
use crate::app::Route;

#[component]
pub fn Lesson(id: String) -> Element {
    rsx! {
        RequireAuth {
            Layout {
                title: "Lesson".to_string(),
                nav_active: "home".to_string(),
                LessonView { id }
            }
        }
    }
}

#[component]
fn LessonView(id: String) -> Element {
    let session = use_session();
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let lesson_id = id.clone();
    let mut lesson =
        use_resource(move || {
            let id = lesson_id.clone();
            async move { HttpApi.get_lesson(&id).await.ok() }
        });

    let complete_id = id.clone();
    let on_complete = move |_| {
        if busy() {
            return;
        }
        busy.set(true);
        error.set(None);
        let lesson_id = complete_id.clone();
        let course_id = lesson
            .peek()
            .clone()
            .flatten()
            .map(|l| l.course_id)
            .unwrap_or_default();
        spawn(async move {
            match HttpApi.complete_lesson(&lesson_id).await {
                Ok(()) => {
                    // Server applied XP/energy/streak effects; pick them up
                    session.refresh_stats().await;
                    if course_id.is_empty() {
                        navigator().push(Route::Home {});
                    } else {
                        navigator().push(Route::Course { id: course_id });
                    }
                }
                Err(err) => error.set(Some(err.to_string())),
            }
            busy.set(false);
        });
    };

    let rendered = match lesson.read().clone() {
        None => rsx! {
            article { aria_busy: "true", "Loading lesson…" }
        },
        Some(None) => rsx! {
            article { class: "fetch-error",
                p { "Couldn't load this lesson." }
                button {
                    class: "btn",
                    onclick: move |_| lesson.restart(),
                    "Try again"
                }
            }
        },
        Some(Some(content)) => rsx! {
            article { class: "lesson",
                hgroup {
                    h1 { "{content.title}" }
                    p { class: "text-muted", "+{content.xp_reward} XP on completion" }
                }
                if let Some(message) = error() {
                    ErrorAlert {
                        message,
                        on_dismiss: move |_| error.set(None),
                    }
                }
                div { class: "lesson-body",
                    for (i, paragraph) in content.body.split("\n\n").enumerate() {
                        p { key: "{i}", "{paragraph}" }
                    }
                }
                button {
                    class: "btn btn-primary btn-lg",
                    disabled: busy(),
                    onclick: on_complete,
                    if busy() { "Saving…" } else { "Complete lesson" }
                }
            }
        },
    };
    rendered
}
