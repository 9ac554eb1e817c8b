//! Credential token persistence boundary.
//!
//! The session store only ever asks "is a token pair present?" and "clear
//! it"; the HTTP client stores the pair returned by the auth endpoints and
//! attaches the access token to requests. Tokens live in browser
//! localStorage; native builds (SSR, tests) see an empty store.

#[cfg(target_arch = "wasm32")]
const ACCESS_KEY: &str = "bloom-access-token";
#[cfg(target_arch = "wasm32")]
const REFRESH_KEY: &str = "bloom-refresh-token";

/// Synchronous credential-pair store. No network.
pub trait TokenStore {
    /// Whether a stored credential pair exists.
    fn has_tokens(&self) -> bool;

    /// Current access token, if any.
    fn access_token(&self) -> Option<String>;

    /// Persist a freshly issued pair.
    fn store(&self, access: &str, refresh: &str);

    /// Drop the stored pair (logout, or a rejected token at bootstrap).
    fn clear(&self);
}

/// localStorage-backed store used by the browser client.
#[derive(Clone, Copy, Default)]
pub struct BrowserTokens;

#[cfg(target_arch = "wasm32")]
impl TokenStore for BrowserTokens {
    fn has_tokens(&self) -> bool {
        self.access_token().is_some()
    }

    fn access_token(&self) -> Option<String> {
        read_item(ACCESS_KEY)
    }

    fn store(&self, access: &str, refresh: &str) {
        write_item(ACCESS_KEY, access);
        write_item(REFRESH_KEY, refresh);
    }

    fn clear(&self) {
        remove_item(ACCESS_KEY);
        remove_item(REFRESH_KEY);
    }
}

/// SSR stub - no credentials exist outside the browser
#[cfg(not(target_arch = "wasm32"))]
impl TokenStore for BrowserTokens {
    fn has_tokens(&self) -> bool {
        false
    }

    fn access_token(&self) -> Option<String> {
        None
    }

    fn store(&self, _access: &str, _refresh: &str) {}

    fn clear(&self) {}
}

// ============ WASM-only helpers ============

#[cfg(target_arch = "wasm32")]
fn read_item(key: &str) -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok()??;
    storage.get_item(key).ok()?
}

#[cfg(target_arch = "wasm32")]
fn write_item(key: &str, value: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(key, value);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn remove_item(key: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}
