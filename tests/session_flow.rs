//! Session state machine tests.
//!
//! Drives the exact store the browser uses, natively, against a scripted
//! API client and an in-memory token store. Asserts the transitions and
//! call counts the UI relies on (e.g. no network when no tokens exist).

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use tokio_test::block_on;

use bloom_web::app::api::{
    AchievementsResponse, Api, ApiError, CourseDetailResponse, CoursesResponse, Lesson, User,
    UserStats,
};
use bloom_web::app::session::{SessionPhase, SessionStore, StatsState};
use bloom_web::app::subscription::{Plan, SubscriptionStatus};
use bloom_web::app::tokens::TokenStore;

// =============================================================================
// Test doubles
// =============================================================================

#[derive(Clone, Default)]
struct MockTokens(Rc<TokenCells>);

#[derive(Default)]
struct TokenCells {
    present: Cell<bool>,
    cleared: Cell<u32>,
}

impl MockTokens {
    fn with_tokens() -> Self {
        let tokens = MockTokens::default();
        tokens.0.present.set(true);
        tokens
    }

    fn cleared_count(&self) -> u32 {
        self.0.cleared.get()
    }
}

impl TokenStore for MockTokens {
    fn has_tokens(&self) -> bool {
        self.0.present.get()
    }

    fn access_token(&self) -> Option<String> {
        self.0.present.get().then(|| "access".to_string())
    }

    fn store(&self, _access: &str, _refresh: &str) {
        self.0.present.set(true);
    }

    fn clear(&self) {
        self.0.present.set(false);
        self.0.cleared.set(self.0.cleared.get() + 1);
    }
}

fn not_scripted() -> ApiError {
    ApiError::Network("not scripted".to_string())
}

#[derive(Default)]
struct MockState {
    profile: RefCell<Option<Result<User, ApiError>>>,
    auth: RefCell<Option<Result<User, ApiError>>>,
    stats: RefCell<VecDeque<Result<UserStats, ApiError>>>,
    logout: RefCell<Option<Result<(), ApiError>>>,
    goal: RefCell<Option<Result<(), ApiError>>>,
    total_calls: Cell<u32>,
    stats_calls: Cell<u32>,
    logout_calls: Cell<u32>,
}

/// Scripted API client. Every operation counts toward `total_calls`;
/// unscripted operations fail with a network error.
#[derive(Clone, Default)]
struct MockApi(Rc<MockState>);

impl MockApi {
    fn script_profile(&self, result: Result<User, ApiError>) {
        *self.0.profile.borrow_mut() = Some(result);
    }

    fn script_auth(&self, result: Result<User, ApiError>) {
        *self.0.auth.borrow_mut() = Some(result);
    }

    fn push_stats(&self, result: Result<UserStats, ApiError>) {
        self.0.stats.borrow_mut().push_back(result);
    }

    fn script_logout(&self, result: Result<(), ApiError>) {
        *self.0.logout.borrow_mut() = Some(result);
    }

    fn script_goal(&self, result: Result<(), ApiError>) {
        *self.0.goal.borrow_mut() = Some(result);
    }

    fn total_calls(&self) -> u32 {
        self.0.total_calls.get()
    }

    fn stats_calls(&self) -> u32 {
        self.0.stats_calls.get()
    }

    fn logout_calls(&self) -> u32 {
        self.0.logout_calls.get()
    }

    fn count(&self) {
        self.0.total_calls.set(self.0.total_calls.get() + 1);
    }

    fn auth_result(&self) -> Result<User, ApiError> {
        self.count();
        self.0
            .auth
            .borrow()
            .clone()
            .unwrap_or_else(|| Err(not_scripted()))
    }
}

#[async_trait(?Send)]
impl Api for MockApi {
    async fn get_profile(&self) -> Result<User, ApiError> {
        self.count();
        self.0
            .profile
            .borrow()
            .clone()
            .unwrap_or_else(|| Err(not_scripted()))
    }

    async fn login(&self, _email: &str, _password: &str) -> Result<User, ApiError> {
        self.auth_result()
    }

    async fn register(
        &self,
        _name: &str,
        _email: &str,
        _password: &str,
    ) -> Result<User, ApiError> {
        self.auth_result()
    }

    async fn google_login(&self, _credential: &str) -> Result<User, ApiError> {
        self.auth_result()
    }

    async fn apple_login(
        &self,
        _id_token: &str,
        _name_hint: Option<&str>,
    ) -> Result<User, ApiError> {
        self.auth_result()
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.count();
        self.0.logout_calls.set(self.0.logout_calls.get() + 1);
        self.0.logout.borrow().clone().unwrap_or(Ok(()))
    }

    async fn get_user_stats(&self) -> Result<UserStats, ApiError> {
        self.count();
        self.0.stats_calls.set(self.0.stats_calls.get() + 1);
        self.0
            .stats
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(not_scripted()))
    }

    async fn set_daily_goal(&self, _goal: u32) -> Result<(), ApiError> {
        self.count();
        self.0.goal.borrow().clone().unwrap_or(Ok(()))
    }

    async fn get_achievements(&self) -> Result<AchievementsResponse, ApiError> {
        self.count();
        Err(not_scripted())
    }

    async fn get_courses(&self) -> Result<CoursesResponse, ApiError> {
        self.count();
        Err(not_scripted())
    }

    async fn get_course(&self, _id: &str) -> Result<CourseDetailResponse, ApiError> {
        self.count();
        Err(not_scripted())
    }

    async fn get_lesson(&self, _id: &str) -> Result<Lesson, ApiError> {
        self.count();
        Err(not_scripted())
    }

    async fn complete_lesson(&self, _id: &str) -> Result<(), ApiError> {
        self.count();
        Err(not_scripted())
    }

    async fn get_subscription_status(&self) -> Result<SubscriptionStatus, ApiError> {
        self.count();
        Err(not_scripted())
    }

    async fn create_checkout_session(&self, _plan: Plan) -> Result<String, ApiError> {
        self.count();
        Err(not_scripted())
    }

    async fn create_portal_session(&self) -> Result<String, ApiError> {
        self.count();
        Err(not_scripted())
    }

    async fn admin_grant_premium(
        &self,
        _user_id: &str,
        _secret: &str,
        _note: Option<&str>,
    ) -> Result<(), ApiError> {
        self.count();
        Err(not_scripted())
    }

    async fn admin_revoke_premium(&self, _user_id: &str, _secret: &str) -> Result<(), ApiError> {
        self.count();
        Err(not_scripted())
    }
}

fn some_user() -> User {
    User {
        id: "u1".to_string(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        is_premium: Some(false),
    }
}

fn stats_with_xp(xp: i64) -> UserStats {
    UserStats {
        xp,
        level: 2,
        xp_for_current_level: 100,
        xp_for_next_level: 300,
        energy: 4,
        energy_max: 5,
        ..Default::default()
    }
}

// =============================================================================
// Bootstrap
// =============================================================================

#[test]
fn no_tokens_resolves_anonymous_without_network() {
    let api = MockApi::default();
    let mut store = SessionStore::new(api.clone(), MockTokens::default());
    assert_eq!(store.state().phase(), SessionPhase::Resolving);

    block_on(store.bootstrap());

    assert_eq!(store.state().phase(), SessionPhase::Anonymous);
    assert!(!store.state().resolving);
    assert_eq!(api.total_calls(), 0, "no network calls expected");
}

#[test]
fn stored_tokens_resolve_to_authenticated_session() {
    let api = MockApi::default();
    api.script_profile(Ok(some_user()));
    api.push_stats(Ok(stats_with_xp(150)));
    let mut store = SessionStore::new(api.clone(), MockTokens::with_tokens());

    block_on(store.bootstrap());

    assert_eq!(store.state().phase(), SessionPhase::Authenticated);
    assert_eq!(
        store.state().stats.get().map(|s| s.xp),
        Some(150),
        "stats should load alongside the profile"
    );
}

#[test]
fn bootstrap_stats_failure_is_swallowed() {
    let api = MockApi::default();
    api.script_profile(Ok(some_user()));
    api.push_stats(Err(ApiError::Api("stats exploded".to_string())));
    let mut store = SessionStore::new(api.clone(), MockTokens::with_tokens());

    block_on(store.bootstrap());

    // Still authenticated; the failure is recorded, not surfaced
    assert_eq!(store.state().phase(), SessionPhase::Authenticated);
    assert_eq!(store.state().stats, StatsState::Unavailable);
}

#[test]
fn rejected_token_clears_and_goes_anonymous() {
    let api = MockApi::default();
    api.script_profile(Err(ApiError::Api("token expired".to_string())));
    let tokens = MockTokens::with_tokens();
    let mut store = SessionStore::new(api.clone(), tokens.clone());

    block_on(store.bootstrap());

    assert_eq!(store.state().phase(), SessionPhase::Anonymous);
    assert_eq!(tokens.cleared_count(), 1);
    assert!(!tokens.has_tokens());
    assert_eq!(api.stats_calls(), 0, "no stats fetch after a rejected token");
}

// =============================================================================
// Sign-in operations
// =============================================================================

#[test]
fn login_success_with_failing_stats_keeps_user() {
    let api = MockApi::default();
    api.script_auth(Ok(some_user()));
    api.push_stats(Err(ApiError::Network("offline".to_string())));
    let mut store = SessionStore::new(api.clone(), MockTokens::default());

    let result = block_on(store.login("ada@example.com", "hunter22"));

    assert_eq!(result, Ok(()));
    assert_eq!(store.state().phase(), SessionPhase::Authenticated);
    assert_eq!(store.state().user.as_ref().map(|u| u.id.as_str()), Some("u1"));
    assert_eq!(store.state().stats, StatsState::Unavailable);
}

#[test]
fn login_failure_propagates_without_state_change() {
    let api = MockApi::default();
    api.script_auth(Err(ApiError::Api("bad credentials".to_string())));
    let mut store = SessionStore::new(api.clone(), MockTokens::default());
    block_on(store.bootstrap());

    let result = block_on(store.login("ada@example.com", "wrong"));

    assert_eq!(result, Err(ApiError::Api("bad credentials".to_string())));
    assert_eq!(store.state().phase(), SessionPhase::Anonymous);
    assert_eq!(store.state().stats, StatsState::NotLoaded);
    assert_eq!(api.stats_calls(), 0, "no stats fetch after a failed login");
}

#[test]
fn social_sign_in_establishes_session() {
    for social in ["google", "apple"] {
        let api = MockApi::default();
        api.script_auth(Ok(some_user()));
        api.push_stats(Ok(stats_with_xp(10)));
        let mut store = SessionStore::new(api.clone(), MockTokens::default());

        let result = match social {
            "google" => block_on(store.google_login("a.jwt.credential")),
            _ => block_on(store.apple_login("an.id.token", Some("Ada"))),
        };

        assert_eq!(result, Ok(()), "{social} sign-in should succeed");
        assert_eq!(store.state().phase(), SessionPhase::Authenticated);
    }
}

// =============================================================================
// Logout
// =============================================================================

#[test]
fn logout_clears_locally_even_when_remote_fails() {
    let api = MockApi::default();
    api.script_profile(Ok(some_user()));
    api.push_stats(Ok(stats_with_xp(150)));
    api.script_logout(Err(ApiError::Network("offline".to_string())));
    let tokens = MockTokens::with_tokens();
    let mut store = SessionStore::new(api.clone(), tokens.clone());
    block_on(store.bootstrap());
    assert_eq!(store.state().phase(), SessionPhase::Authenticated);

    block_on(store.logout());

    assert_eq!(store.state().phase(), SessionPhase::Anonymous);
    assert_eq!(store.state().stats, StatsState::NotLoaded);
    assert!(!tokens.has_tokens());
    assert_eq!(api.logout_calls(), 1, "remote logout is still attempted");
}

// =============================================================================
// Stats refresh and daily goal
// =============================================================================

#[test]
fn refresh_keeps_previous_stats_on_failure() {
    let api = MockApi::default();
    api.script_auth(Ok(some_user()));
    api.push_stats(Ok(stats_with_xp(100)));
    let mut store = SessionStore::new(api.clone(), MockTokens::default());
    block_on(store.login("ada@example.com", "hunter22")).expect("login");

    // Failed refresh: silent, previous snapshot kept
    api.push_stats(Err(ApiError::Network("offline".to_string())));
    block_on(store.refresh_stats());
    assert_eq!(store.state().stats.get().map(|s| s.xp), Some(100));

    // Next refresh succeeds and replaces wholesale
    api.push_stats(Ok(stats_with_xp(220)));
    block_on(store.refresh_stats());
    assert_eq!(store.state().stats.get().map(|s| s.xp), Some(220));
}

#[test]
fn set_daily_goal_refreshes_stats_on_success() {
    let api = MockApi::default();
    api.script_auth(Ok(some_user()));
    api.push_stats(Ok(stats_with_xp(100)));
    let mut store = SessionStore::new(api.clone(), MockTokens::default());
    block_on(store.login("ada@example.com", "hunter22")).expect("login");
    let calls_before = api.stats_calls();

    api.script_goal(Ok(()));
    let mut refreshed = stats_with_xp(100);
    refreshed.daily_goal = 50;
    api.push_stats(Ok(refreshed));

    let result = block_on(store.set_daily_goal(50));

    assert_eq!(result, Ok(()));
    assert_eq!(api.stats_calls(), calls_before + 1);
    assert_eq!(store.state().stats.get().map(|s| s.daily_goal), Some(50));
}

#[test]
fn set_daily_goal_propagates_failure_without_refresh() {
    let api = MockApi::default();
    api.script_auth(Ok(some_user()));
    api.push_stats(Ok(stats_with_xp(100)));
    let mut store = SessionStore::new(api.clone(), MockTokens::default());
    block_on(store.login("ada@example.com", "hunter22")).expect("login");
    let calls_before = api.stats_calls();

    api.script_goal(Err(ApiError::Api("goal out of range".to_string())));

    let result = block_on(store.set_daily_goal(10_000));

    assert_eq!(result, Err(ApiError::Api("goal out of range".to_string())));
    assert_eq!(api.stats_calls(), calls_before, "no refresh after a failed write");
    // Prior snapshot is untouched
    assert_eq!(store.state().stats.get().map(|s| s.xp), Some(100));
}
