//! Progress widgets fed by the derived-metrics calculator.

use dioxus::prelude::*;

use crate::app::achievements;
use crate::app::metrics::{self, EnergyDisplay};

/// XP progress bar through the current level.
#[component]
pub fn LevelBar(xp: i64, xp_for_current: i64, xp_for_next: i64, level: u32) -> Element {
    let pct = metrics::level_progress_pct(xp, xp_for_current, xp_for_next);
    let into = (xp - xp_for_current).max(0);
    let needed = (xp_for_next - xp_for_current).max(0);
    let next_level = level + 1;

    rsx! {
        div { class: "level-bar",
            div { class: "level-bar-header",
                span { "Level {level}" }
                span { class: "text-muted", "{into} / {needed} XP" }
            }
            div { class: "bar",
                div { class: "bar-fill", style: "width: {pct}%" }
            }
            small { class: "text-muted", "{pct}% to level {next_level}" }
        }
    }
}

/// 14-day activity calendar ending at today. The calendar reflects recency:
/// a lapsed streak shows no active cells regardless of the counter.
#[component]
pub fn StreakCalendar(current_streak: u32, last_activity: Option<String>) -> Element {
    let today = metrics::today_local();
    let last = last_activity
        .as_deref()
        .and_then(metrics::parse_activity_date);
    let cells = metrics::streak_cells(current_streak, last, today);

    rsx! {
        div { class: "streak-calendar",
            div { class: "streak-header",
                span { "🔥 {current_streak} day streak" }
            }
            div { class: "streak-cells",
                for (i, active) in cells.iter().enumerate() {
                    div {
                        key: "{i}",
                        class: if *active { "streak-cell active" } else { "streak-cell" },
                    }
                }
            }
        }
    }
}

/// Energy meter with a local once-per-second countdown to the next refill.
///
/// The tick is a pure local clock counting down from the last-fetched
/// snapshot; it drifts from server truth until the next stats refresh. The
/// interval is torn down when the component unmounts; parents key this
/// component on the snapshot so a new snapshot restarts the clock.
#[component]
pub fn EnergyCountdown(energy: u32, energy_max: u32, ms_until_refill: i64) -> Element {
    let remaining = use_signal(|| ms_until_refill);

    // Client-side only: run the tick behind an RAII guard that clears the
    // interval when the component unmounts
    #[cfg(target_arch = "wasm32")]
    {
        use std::cell::RefCell;
        use std::rc::Rc;

        let guard: Rc<RefCell<Option<IntervalGuard>>> = use_hook(|| Rc::new(RefCell::new(None)));
        let guard_clone = guard.clone();
        use_effect(move || {
            if guard_clone.borrow().is_some() {
                return;
            }
            *guard_clone.borrow_mut() = start_tick(remaining);
        });
    }

    let countdown = match metrics::energy_display(energy, energy_max, remaining()) {
        EnergyDisplay::Refilling(ms) => Some(metrics::format_countdown(ms)),
        EnergyDisplay::Full => None,
    };

    rsx! {
        div { class: "energy-meter",
            span { class: "energy-hearts", "⚡ {energy} / {energy_max}" }
            if let Some(countdown) = countdown {
                span { class: "energy-countdown", "Next refill in {countdown}" }
            } else {
                span { class: "energy-full", "Energy full" }
            }
        }
    }
}

/// Catalog grid with earned/locked state from the server-reported id list.
#[component]
pub fn AchievementGrid(earned_ids: Vec<String>) -> Element {
    rsx! {
        div { class: "achievement-grid",
            for (achievement, earned) in achievements::earned_flags(&earned_ids) {
                div {
                    key: "{achievement.id}",
                    class: if earned { "achievement earned" } else { "achievement locked" },
                    title: "{achievement.description}",
                    span { class: "achievement-emoji", {achievement.emoji} }
                    span { class: "achievement-title", {achievement.title} }
                }
            }
        }
    }
}

// ============ WASM-only helpers ============

/// RAII guard clearing the interval on drop (component unmount).
#[cfg(target_arch = "wasm32")]
struct IntervalGuard {
    handle: i32,
    // Dropped with the guard so the callback isn't leaked
    _tick: wasm_bindgen::closure::Closure<dyn FnMut()>,
}

#[cfg(target_arch = "wasm32")]
impl Drop for IntervalGuard {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.handle);
        }
    }
}

/// Start the 1s countdown tick. No network: the clock only decrements the
/// last-fetched snapshot.
#[cfg(target_arch = "wasm32")]
fn start_tick(mut remaining: Signal<i64>) -> Option<IntervalGuard> {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    let tick = Closure::wrap(Box::new(move || {
        let current = *remaining.peek();
        if current > 0 {
            remaining.set((current - 1000).max(0));
        }
    }) as Box<dyn FnMut()>);

    let window = web_sys::window()?;
    let handle = window
        .set_interval_with_callback_and_timeout_and_arguments_0(tick.as_ref().unchecked_ref(), 1000)
        .ok()?;

    Some(IntervalGuard {
        handle,
        _tick: tick,
    })
}
