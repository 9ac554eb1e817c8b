//! Profile page: progress dashboard, daily goal, achievements, account.

use dioxus::prelude::*;

use crate::app::api::{Api, HttpApi};
use crate::app::components::{
    AchievementGrid, EnergyCountdown, ErrorAlert, Layout, LevelBar, StreakCalendar,
};
use crate::app::guard::RequireAuth;
use crate::app::session::use_session;
use crate::app::theme::ThemeSwitcher;
use crate::app::Route;

const GOAL_CHOICES: [u32; 4] = [10, 20, 30, 50];

#[component]
pub fn Profile() -> Element {
    rsx! {
        RequireAuth {
            Layout {
                title: "Profile".to_string(),
                nav_active: "profile".to_string(),
                ProfileView {}
            }
        }
    }
}

#[component]
fn ProfileView() -> Element {
    let session = use_session();
    let mut goal_busy = use_signal(|| false);
    let mut goal_error = use_signal(|| None::<String>);
    let mut logging_out = use_signal(|| false);

    // Earned-achievement records; a failed fetch silently falls back to the
    // id list carried on the stats payload
    let achievements = use_resource(|| async { HttpApi.get_achievements().await.ok() });

    let user = session.user();
    let stats = session.stats().snapshot();

    let earned_ids: Vec<String> = match achievements.read().clone().flatten() {
        Some(resp) => resp.achievements.into_iter().map(|a| a.id).collect(),
        None => stats.achievements.clone(),
    };

    let on_goal_change = move |e: FormEvent| {
        let Ok(goal) = e.value().parse::<u32>() else {
            return;
        };
        if goal_busy() {
            return;
        }
        goal_busy.set(true);
        goal_error.set(None);
        spawn(async move {
            if let Err(err) = session.set_daily_goal(goal).await {
                goal_error.set(Some(err.to_string()));
            }
            goal_busy.set(false);
        });
    };

    let on_logout = move |_| {
        if logging_out() {
            return;
        }
        logging_out.set(true);
        spawn(async move {
            session.logout().await;
            navigator().push(Route::Login {});
        });
    };

    rsx! {
        if let Some(user) = user {
            hgroup {
                h1 { "{user.name}" }
                p { class: "text-muted", "{user.email}" }
            }
            if user.is_premium == Some(true) {
                span { class: "badge badge-premium", "⭐ Premium" }
            }
        }

        section { id: "progress",
            h2 { "Progress" }
            LevelBar {
                xp: stats.xp,
                xp_for_current: stats.xp_for_current_level,
                xp_for_next: stats.xp_for_next_level,
                level: stats.level,
            }
            p { class: "text-muted",
                "{stats.completed_lessons} lessons completed · {stats.xp} XP total"
            }
        }

        section { id: "streak",
            h2 { "Streak" }
            StreakCalendar {
                current_streak: stats.streak.current_streak,
                last_activity: stats.streak.last_activity_date.clone(),
            }
            if stats.streak_freezes > 0 {
                small { class: "text-muted", "🧊 {stats.streak_freezes} streak freezes left" }
            }
        }

        section { id: "energy",
            h2 { "Energy" }
            EnergyCountdown {
                key: "{stats.ms_until_next_energy_refill}",
                energy: stats.energy,
                energy_max: stats.energy_max,
                ms_until_refill: stats.ms_until_next_energy_refill,
            }
        }

        section { id: "daily-goal",
            h2 { "Daily goal" }
            if let Some(message) = goal_error() {
                ErrorAlert {
                    message,
                    on_dismiss: move |_| goal_error.set(None),
                }
            }
            label {
                "Minutes per day"
                select {
                    value: "{stats.daily_goal}",
                    disabled: goal_busy(),
                    onchange: on_goal_change,
                    for choice in GOAL_CHOICES {
                        option {
                            value: "{choice}",
                            selected: choice == stats.daily_goal,
                            "{choice} min"
                        }
                    }
                }
            }
        }

        section { id: "achievements",
            h2 { "Achievements" }
            AchievementGrid { earned_ids }
        }

        section { id: "appearance",
            h2 { "Appearance" }
            ThemeSwitcher {}
        }

        section { id: "account",
            button {
                class: "btn btn-danger",
                disabled: logging_out(),
                onclick: on_logout,
                if logging_out() { "Signing out…" } else { "Sign out" }
            }
        }
    }
}
