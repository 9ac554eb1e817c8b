//! Client-side session store.
//!
//! Owns the authenticated user, the derived-stats snapshot, and the
//! bootstrap loading flag. The state machine lives in [`SessionStore`] so it
//! can be driven natively in tests against a mock [`Api`]; the Dioxus layer
//! wraps it in a context of signals and replaces the state wholesale after
//! every operation, so a render never observes a torn update.
//!
//! Callers are expected to disable their own triggering controls while an
//! operation is in flight; the store does not deduplicate concurrent calls.

use dioxus::prelude::*;

use super::api::{Api, ApiError, HttpApi, User, UserStats};
use super::tokens::{BrowserTokens, TokenStore};

/// Lifecycle phase of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Stored credentials are still being resolved; render nothing protected.
    Resolving,
    /// No user; protected views are inaccessible.
    Anonymous,
    Authenticated,
}

/// Best-effort stats snapshot.
///
/// `Unavailable` records a swallowed fetch failure so consumers and tests
/// can tell it apart from "not fetched yet". Either way the UI treats
/// missing stats as zeroed defaults, never as an error.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum StatsState {
    #[default]
    NotLoaded,
    Loaded(UserStats),
    Unavailable,
}

impl StatsState {
    pub fn get(&self) -> Option<&UserStats> {
        match self {
            StatsState::Loaded(stats) => Some(stats),
            _ => None,
        }
    }

    /// Stats for display: zeroed defaults when absent.
    pub fn snapshot(&self) -> UserStats {
        self.get().cloned().unwrap_or_default()
    }
}

/// The whole session; replaced wholesale on every transition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub stats: StatsState,
    pub resolving: bool,
}

impl SessionState {
    /// Initial state at process start, before stored credentials resolve.
    pub fn booting() -> Self {
        SessionState {
            resolving: true,
            ..Default::default()
        }
    }

    fn authenticated(user: User, stats: StatsState) -> Self {
        SessionState {
            user: Some(user),
            stats,
            resolving: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.resolving {
            SessionPhase::Resolving
        } else if self.user.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase() == SessionPhase::Authenticated
    }
}

/// The session state machine, generic over the API client and token store.
pub struct SessionStore<A, T> {
    api: A,
    tokens: T,
    state: SessionState,
}

impl<A: Api, T: TokenStore> SessionStore<A, T> {
    pub fn new(api: A, tokens: T) -> Self {
        SessionStore {
            api,
            tokens,
            state: SessionState::booting(),
        }
    }

    /// Resume an existing state (the Dioxus layer re-seeds a store per
    /// operation from the current signal value).
    pub fn with_state(api: A, tokens: T, state: SessionState) -> Self {
        SessionStore { api, tokens, state }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn into_state(self) -> SessionState {
        self.state
    }

    /// Resolve stored credentials into a session at process start.
    ///
    /// No stored tokens: straight to Anonymous, no network. A rejected token
    /// is indistinguishable from an expired one, so it clears silently as an
    /// implicit logout rather than surfacing an error.
    pub async fn bootstrap(&mut self) {
        if !self.tokens.has_tokens() {
            self.state = SessionState::default();
            return;
        }
        match self.api.get_profile().await {
            Ok(user) => {
                let stats = self.fetch_stats_best_effort().await;
                self.state = SessionState::authenticated(user, stats);
            }
            Err(err) => {
                tracing::debug!("stored session rejected: {err}");
                self.tokens.clear();
                self.state = SessionState::default();
            }
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ApiError> {
        let user = self.api.login(email, password).await?;
        self.establish(user).await;
        Ok(())
    }

    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let user = self.api.register(name, email, password).await?;
        self.establish(user).await;
        Ok(())
    }

    pub async fn google_login(&mut self, credential: &str) -> Result<(), ApiError> {
        let user = self.api.google_login(credential).await?;
        self.establish(user).await;
        Ok(())
    }

    pub async fn apple_login(
        &mut self,
        id_token: &str,
        name_hint: Option<&str>,
    ) -> Result<(), ApiError> {
        let user = self.api.apple_login(id_token, name_hint).await?;
        self.establish(user).await;
        Ok(())
    }

    /// End the session.
    ///
    /// Local state and tokens clear unconditionally; the remote revocation is
    /// fire-and-forget. A failed network call must not strand the user in a
    /// half-signed-out session.
    pub async fn logout(&mut self) {
        if let Err(err) = self.api.logout().await {
            tracing::warn!("remote logout failed: {err}");
        }
        self.tokens.clear();
        self.state = SessionState::default();
    }

    /// Re-fetch stats, keeping the previous snapshot on failure (silent).
    pub async fn refresh_stats(&mut self) {
        match self.api.get_user_stats().await {
            Ok(stats) => self.state.stats = StatsState::Loaded(stats),
            Err(err) => {
                tracing::debug!("stats refresh failed: {err}");
                if self.state.stats.get().is_none() {
                    self.state.stats = StatsState::Unavailable;
                }
            }
        }
    }

    /// Persist a new daily goal, then refresh stats unconditionally.
    /// The goal write propagates failure; the follow-up refresh is silent.
    pub async fn set_daily_goal(&mut self, goal: u32) -> Result<(), ApiError> {
        self.api.set_daily_goal(goal).await?;
        self.refresh_stats().await;
        Ok(())
    }

    /// Enter Authenticated with a best-effort stats snapshot. A failed stats
    /// fetch is supplementary to the successful primary action and never
    /// degrades the login itself.
    async fn establish(&mut self, user: User) {
        let stats = self.fetch_stats_best_effort().await;
        self.state = SessionState::authenticated(user, stats);
    }

    async fn fetch_stats_best_effort(&self) -> StatsState {
        match self.api.get_user_stats().await {
            Ok(stats) => StatsState::Loaded(stats),
            Err(err) => {
                tracing::debug!("stats fetch failed: {err}");
                StatsState::Unavailable
            }
        }
    }
}

// =============================================================================
// Dioxus context layer
// =============================================================================

/// Global session state shared via context.
#[derive(Clone, Copy)]
pub struct SessionContext {
    state: Signal<SessionState>,
}

impl SessionContext {
    pub fn phase(&self) -> SessionPhase {
        self.state.read().phase()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    pub fn user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    pub fn stats(&self) -> StatsState {
        self.state.read().stats.clone()
    }

    fn store(&self) -> SessionStore<HttpApi, BrowserTokens> {
        SessionStore::with_state(HttpApi, BrowserTokens, self.state.peek().clone())
    }

    fn commit(&self, store: SessionStore<HttpApi, BrowserTokens>) {
        let mut state = self.state;
        state.set(store.into_state());
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let mut store = self.store();
        let res = store.login(email, password).await;
        self.commit(store);
        res
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError> {
        let mut store = self.store();
        let res = store.register(name, email, password).await;
        self.commit(store);
        res
    }

    pub async fn google_login(&self, credential: &str) -> Result<(), ApiError> {
        let mut store = self.store();
        let res = store.google_login(credential).await;
        self.commit(store);
        res
    }

    pub async fn apple_login(&self, id_token: &str, name_hint: Option<&str>) -> Result<(), ApiError> {
        let mut store = self.store();
        let res = store.apple_login(id_token, name_hint).await;
        self.commit(store);
        res
    }

    pub async fn logout(&self) {
        let mut store = self.store();
        store.logout().await;
        self.commit(store);
    }

    pub async fn refresh_stats(&self) {
        let mut store = self.store();
        store.refresh_stats().await;
        self.commit(store);
    }

    pub async fn set_daily_goal(&self, goal: u32) -> Result<(), ApiError> {
        let mut store = self.store();
        let res = store.set_daily_goal(goal).await;
        self.commit(store);
        res
    }
}

/// Initialize session context provider - call once at app root
pub fn use_session_provider() {
    let state = use_signal(SessionState::booting);

    let ctx = SessionContext { state };
    use_context_provider(|| ctx);

    // Client-side only: resolve stored credentials once at app start
    #[cfg(target_arch = "wasm32")]
    {
        use_effect(move || {
            spawn(async move {
                let mut store = SessionStore::new(HttpApi, BrowserTokens);
                store.bootstrap().await;
                ctx.commit(store);
            });
        });
    }
}

/// Get session context - use in any component
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}
