//! Navigation bar with the compact progress strip.

use dioxus::prelude::*;

use crate::app::metrics;
use crate::app::session::use_session;
use crate::app::Route;

#[derive(Props, Clone, PartialEq)]
pub struct NavProps {
    /// The currently active page ID (e.g., "home", "profile")
    pub active: String,
}

/// Top navigation: brand, page links, and (when signed in) a compact
/// level/energy/streak strip derived from the latest stats snapshot.
#[component]
pub fn Nav(props: NavProps) -> Element {
    let session = use_session();
    let active = props.active;

    // Zeroed defaults until stats load; missing stats are never an error
    let stats = session.stats().snapshot();
    let pct = metrics::level_progress_pct(
        stats.xp,
        stats.xp_for_current_level,
        stats.xp_for_next_level,
    );

    rsx! {
        nav { class: "nav",
            ul { class: "nav-brand",
                li {
                    Link { to: Route::Home {}, strong { "Bloom" } }
                }
            }
            if session.is_authenticated() {
                ul { class: "nav-stats",
                    li { class: "nav-level",
                        span { "Lv {stats.level}" }
                        div { class: "bar bar-mini",
                            div { class: "bar-fill", style: "width: {pct}%" }
                        }
                    }
                    li { class: "nav-energy", "⚡ {stats.energy}/{stats.energy_max}" }
                    li { class: "nav-streak", "🔥 {stats.streak.current_streak}" }
                }
                ul { class: "nav-links",
                    li { class: if active == "home" { "active" } else { "" },
                        Link { to: Route::Home {}, "Learn" }
                    }
                    li { class: if active == "premium" { "active" } else { "" },
                        Link { to: Route::Premium {}, "Premium" }
                    }
                    li { class: if active == "profile" { "active" } else { "" },
                        Link { to: Route::Profile {}, "Profile" }
                    }
                }
            } else {
                ul { class: "nav-links",
                    li { class: if active == "login" { "active" } else { "" },
                        Link { to: Route::Login {}, "Sign in" }
                    }
                    li { class: if active == "register" { "active" } else { "" },
                        Link { to: Route::Register {}, "Create account" }
                    }
                }
            }
        }
    }
}
