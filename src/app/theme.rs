//! Theme management with localStorage persistence.
//!
//! Provides a theme context for managing light/dark theme preferences.

use dioxus::prelude::*;

/// Theme options
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::System => "system",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => Theme::System,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::System => "System",
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    /// CSS class to apply to :root (empty for system)
    pub fn css_class(&self) -> &'static str {
        match self {
            Theme::System => "",
            Theme::Light => "theme-light",
            Theme::Dark => "theme-dark",
        }
    }
}

/// Global theme state shared via context
#[derive(Clone, Copy)]
pub struct ThemeContext {
    pub current: Signal<Theme>,
}

impl ThemeContext {
    /// Get current theme
    pub fn get(&self) -> Theme {
        (self.current)()
    }

    /// Set and persist theme
    pub fn set(&self, theme: Theme) {
        let mut current = self.current;
        current.set(theme);

        // Apply to DOM and save to localStorage
        #[cfg(target_arch = "wasm32")]
        {
            apply_theme_to_dom(theme);
            save_theme_to_storage(theme);
        }
    }
}

/// Initialize theme context provider - call once at app root
pub fn use_theme_provider() {
    let current = use_signal(|| Theme::System);

    let ctx = ThemeContext { current };
    use_context_provider(|| ctx);

    // Client-side only: load from localStorage and apply
    #[cfg(target_arch = "wasm32")]
    {
        let mut current = current;
        use_effect(move || {
            let saved = load_theme_from_storage();
            current.set(saved);
            apply_theme_to_dom(saved);
        });
    }
}

/// Get theme context - use in any component
pub fn use_theme() -> ThemeContext {
    use_context::<ThemeContext>()
}

/// Three-way theme selector shown on the profile screen.
#[component]
pub fn ThemeSwitcher() -> Element {
    let theme = use_theme();
    let active = theme.get();

    rsx! {
        div { class: "theme-switcher",
            for option in [Theme::System, Theme::Light, Theme::Dark] {
                button {
                    class: if option == active { "btn btn-sm active" } else { "btn btn-sm" },
                    onclick: move |_| theme.set(option),
                    {option.label()}
                }
            }
        }
    }
}

// ============ WASM-only helpers ============

#[cfg(target_arch = "wasm32")]
fn load_theme_from_storage() -> Theme {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(value)) = storage.get_item("bloom-theme") {
                return Theme::parse(&value);
            }
        }
    }
    Theme::System
}

#[cfg(target_arch = "wasm32")]
fn save_theme_to_storage(theme: Theme) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item("bloom-theme", theme.as_str());
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn apply_theme_to_dom(theme: Theme) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let Some(root) = document.document_element() {
                // Remove all theme classes
                let _ = root.class_list().remove_2("theme-light", "theme-dark");

                // Add the selected theme class (if not system)
                let class = theme.css_class();
                if !class.is_empty() {
                    let _ = root.class_list().add_1(class);
                }
            }
        }
    }
}
