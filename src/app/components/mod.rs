//! Shared UI components for the Bloom web client.

pub mod error_alert;
pub mod layout;
pub mod nav;
pub mod stats;

pub use error_alert::ErrorAlert;
pub use layout::Layout;
pub use nav::Nav;
pub use stats::{AchievementGrid, EnergyCountdown, LevelBar, StreakCalendar};
