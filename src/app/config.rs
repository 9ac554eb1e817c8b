//! Client configuration resolved at build time.
//!
//! A browser bundle cannot read a server-side environment, so values are
//! baked in via `option_env!` at compile time. Native builds (SSR, tests)
//! additionally honor the process environment so values can be overridden
//! without a rebuild.
//!
//! Missing social-login client ids degrade gracefully: the corresponding
//! sign-in buttons are simply not rendered.

/// Base URL of the Bloom API. Empty means same-origin relative paths.
pub fn api_base() -> String {
    #[cfg(not(target_arch = "wasm32"))]
    if let Ok(base) = std::env::var("BLOOM_API_BASE") {
        return normalize_base(&base);
    }
    normalize_base(option_env!("BLOOM_API_BASE").unwrap_or(""))
}

/// Google OAuth client id, if configured.
pub fn google_client_id() -> Option<&'static str> {
    option_env!("BLOOM_GOOGLE_CLIENT_ID").filter(|v| !v.is_empty())
}

/// Apple Services id, if configured.
pub fn apple_client_id() -> Option<&'static str> {
    option_env!("BLOOM_APPLE_CLIENT_ID").filter(|v| !v.is_empty())
}

/// Trim a trailing slash so joined paths never produce `//api/...`.
fn normalize_base(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}
