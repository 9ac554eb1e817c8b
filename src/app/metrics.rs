//! Pure derived-metrics calculations for the progress UI.
//!
//! Stateless functions over primitives so the display math is replayable in
//! tests. The energy countdown counts down locally from the last-fetched
//! snapshot and drifts from server truth until the next stats refresh; that
//! staleness is accepted.

use chrono::{Duration, NaiveDate};

/// Days shown by the streak calendar, ending at today.
pub const STREAK_WINDOW_DAYS: usize = 14;

/// Percentage of progress through the current level, clamped to 0..=100.
///
/// An empty or inverted level window (`xp_for_next <= xp_for_current`)
/// yields 0 at every call site.
pub fn level_progress_pct(xp: i64, xp_for_current: i64, xp_for_next: i64) -> u8 {
    let needed = xp_for_next - xp_for_current;
    if needed <= 0 {
        return 0;
    }
    let into = xp - xp_for_current;
    let pct = (into as f64 / needed as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Parse the API's `YYYY-MM-DD` activity date.
pub fn parse_activity_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Reconstruct the streak calendar covering `[today-13, today]`.
///
/// A streak only counts as alive when the last activity was today or
/// yesterday; a dead streak renders every cell inactive no matter what the
/// numeric counter says. For a live streak, cells run contiguously backwards
/// from the last-activity day.
pub fn streak_cells(
    current_streak: u32,
    last_activity: Option<NaiveDate>,
    today: NaiveDate,
) -> [bool; STREAK_WINDOW_DAYS] {
    let mut cells = [false; STREAK_WINDOW_DAYS];
    let Some(last) = last_activity else {
        return cells;
    };
    if current_streak == 0 {
        return cells;
    }

    let yesterday = today - Duration::days(1);
    let reference = if last == today {
        today
    } else if last == yesterday {
        yesterday
    } else {
        return cells;
    };

    for (i, cell) in cells.iter_mut().enumerate() {
        let day = today - Duration::days((STREAK_WINDOW_DAYS - 1 - i) as i64);
        let offset = (reference - day).num_days();
        *cell = offset >= 0 && (offset as u64) < u64::from(current_streak);
    }
    cells
}

/// What the energy meter should show for a stats snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnergyDisplay {
    /// All hearts full; no countdown runs.
    Full,
    /// Counting down the contained milliseconds until the next unit refills.
    Refilling(i64),
}

pub fn energy_display(energy: u32, energy_max: u32, ms_until_refill: i64) -> EnergyDisplay {
    if energy >= energy_max || ms_until_refill <= 0 {
        EnergyDisplay::Full
    } else {
        EnergyDisplay::Refilling(ms_until_refill)
    }
}

/// Format a refill countdown as `{h}h {mm}m {ss}s`, omitting a zero hour.
/// Negative inputs clamp to zero.
pub fn format_countdown(ms: i64) -> String {
    let total_secs = ms.max(0) / 1000;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    if h > 0 {
        format!("{h}h {m:02}m {s:02}s")
    } else {
        format!("{m:02}m {s:02}s")
    }
}

/// Today's calendar date in the user's local timezone.
#[cfg(target_arch = "wasm32")]
pub fn today_local() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .unwrap_or_else(|| chrono::Utc::now().date_naive())
}

/// Today's calendar date in the user's local timezone.
#[cfg(not(target_arch = "wasm32"))]
pub fn today_local() -> NaiveDate {
    chrono::Local::now().date_naive()
}
