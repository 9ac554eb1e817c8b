//! Typed client for the remote Bloom API.
//!
//! All data types mirror the API's camelCase JSON. The [`Api`] trait is the
//! seam the session store and pages are written against; [`HttpApi`] is the
//! browser implementation over `fetch`. Native builds get SSR stubs that
//! fail fast, mirroring the wasm helpers below.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::subscription::{Plan, SubscriptionStatus};
use super::tokens::{BrowserTokens, TokenStore};

// =============================================================================
// Error Type
// =============================================================================

/// Failure surfaced by an API operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Error message reported by the API (`{"error": "..."}` body).
    #[error("{0}")]
    Api(String),
    /// Transport-level failure (offline, DNS, CORS, non-browser build).
    #[error("network error: {0}")]
    Network(String),
    /// The response body didn't match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

// =============================================================================
// Auth Types
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Absent on older profile payloads; resolved against the subscription
    /// record by the premium reconciler.
    #[serde(default)]
    pub is_premium: Option<bool>,
}

/// Auth endpoints return the user plus a fresh credential pair.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleLoginRequest<'a> {
    credential: &'a str,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AppleLoginRequest<'a> {
    id_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

// =============================================================================
// Stats Types
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default)]
    pub xp: i64,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub xp_for_current_level: i64,
    #[serde(default)]
    pub xp_for_next_level: i64,
    #[serde(default)]
    pub energy: u32,
    #[serde(default)]
    pub energy_max: u32,
    /// Snapshot of the refill timer at fetch time; the UI counts down
    /// locally from here.
    #[serde(default)]
    pub ms_until_next_energy_refill: i64,
    #[serde(default)]
    pub streak: StreakInfo,
    #[serde(default)]
    pub streak_freezes: u32,
    #[serde(default)]
    pub daily_goal: u32,
    #[serde(default)]
    pub completed_lessons: u32,
    /// Earned achievement ids as reported with the stats payload.
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreakInfo {
    #[serde(default)]
    pub current_streak: u32,
    /// ISO calendar date (`YYYY-MM-DD`) of the last completed activity.
    #[serde(default)]
    pub last_activity_date: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DailyGoalRequest {
    goal: u32,
}

// =============================================================================
// Achievement Types
// =============================================================================

/// Server-side record of an earned achievement.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EarnedAchievement {
    pub id: String,
    #[serde(default)]
    pub earned_at: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AchievementsResponse {
    #[serde(default)]
    pub achievements: Vec<EarnedAchievement>,
}

// =============================================================================
// Course Types
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub lesson_count: u32,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CoursesResponse {
    #[serde(default)]
    pub courses: Vec<Course>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub xp_reward: u32,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CourseDetailResponse {
    pub course: Course,
    #[serde(default)]
    pub lessons: Vec<LessonSummary>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    #[serde(default)]
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub xp_reward: u32,
}

// =============================================================================
// Subscription Request/Response Types
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionStatusResponse {
    #[serde(default)]
    pub status: SubscriptionStatus,
}

#[derive(Clone, Debug, Serialize)]
struct CheckoutRequest {
    plan: Plan,
}

/// Checkout and billing-portal endpoints return an opaque redirect URL.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RedirectResponse {
    pub url: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminGrantRequest<'a> {
    user_id: &'a str,
    secret: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminRevokeRequest<'a> {
    user_id: &'a str,
    secret: &'a str,
}

// =============================================================================
// Api Trait
// =============================================================================

/// Asynchronous Bloom API operations.
///
/// `?Send` because the browser futures aren't `Send`; native tests drive the
/// session store against a scripted mock of this trait.
#[async_trait(?Send)]
pub trait Api {
    async fn get_profile(&self) -> Result<User, ApiError>;
    async fn login(&self, email: &str, password: &str) -> Result<User, ApiError>;
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, ApiError>;
    async fn google_login(&self, credential: &str) -> Result<User, ApiError>;
    async fn apple_login(&self, id_token: &str, name_hint: Option<&str>)
        -> Result<User, ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;

    async fn get_user_stats(&self) -> Result<UserStats, ApiError>;
    async fn set_daily_goal(&self, goal: u32) -> Result<(), ApiError>;
    async fn get_achievements(&self) -> Result<AchievementsResponse, ApiError>;

    async fn get_courses(&self) -> Result<CoursesResponse, ApiError>;
    async fn get_course(&self, id: &str) -> Result<CourseDetailResponse, ApiError>;
    async fn get_lesson(&self, id: &str) -> Result<Lesson, ApiError>;
    async fn complete_lesson(&self, id: &str) -> Result<(), ApiError>;

    async fn get_subscription_status(&self) -> Result<SubscriptionStatus, ApiError>;
    async fn create_checkout_session(&self, plan: Plan) -> Result<String, ApiError>;
    async fn create_portal_session(&self) -> Result<String, ApiError>;
    async fn admin_grant_premium(
        &self,
        user_id: &str,
        secret: &str,
        note: Option<&str>,
    ) -> Result<(), ApiError>;
    async fn admin_revoke_premium(&self, user_id: &str, secret: &str) -> Result<(), ApiError>;
}

/// Browser implementation of [`Api`] over `fetch`.
#[derive(Clone, Copy, Default)]
pub struct HttpApi;

#[async_trait(?Send)]
impl Api for HttpApi {
    async fn get_profile(&self) -> Result<User, ApiError> {
        fetch_json("/api/auth/profile").await
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let resp: AuthResponse = post_json("/api/auth/login", &LoginRequest { email, password }).await?;
        Ok(remember_tokens(resp))
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, ApiError> {
        let body = RegisterRequest { name, email, password };
        let resp: AuthResponse = post_json("/api/auth/register", &body).await?;
        Ok(remember_tokens(resp))
    }

    async fn google_login(&self, credential: &str) -> Result<User, ApiError> {
        let resp: AuthResponse =
            post_json("/api/auth/google", &GoogleLoginRequest { credential }).await?;
        Ok(remember_tokens(resp))
    }

    async fn apple_login(
        &self,
        id_token: &str,
        name_hint: Option<&str>,
    ) -> Result<User, ApiError> {
        let body = AppleLoginRequest { id_token, name: name_hint };
        let resp: AuthResponse = post_json("/api/auth/apple", &body).await?;
        Ok(remember_tokens(resp))
    }

    async fn logout(&self) -> Result<(), ApiError> {
        post_json_no_response("/api/auth/logout", &()).await
    }

    async fn get_user_stats(&self) -> Result<UserStats, ApiError> {
        fetch_json("/api/user/stats").await
    }

    async fn set_daily_goal(&self, goal: u32) -> Result<(), ApiError> {
        post_json_no_response("/api/user/daily-goal", &DailyGoalRequest { goal }).await
    }

    async fn get_achievements(&self) -> Result<AchievementsResponse, ApiError> {
        fetch_json("/api/achievements").await
    }

    async fn get_courses(&self) -> Result<CoursesResponse, ApiError> {
        fetch_json("/api/courses").await
    }

    async fn get_course(&self, id: &str) -> Result<CourseDetailResponse, ApiError> {
        fetch_json(&format!("/api/courses/{}", urlencoding::encode(id))).await
    }

    async fn get_lesson(&self, id: &str) -> Result<Lesson, ApiError> {
        fetch_json(&format!("/api/lessons/{}", urlencoding::encode(id))).await
    }

    async fn complete_lesson(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/api/lessons/{}/complete", urlencoding::encode(id));
        post_json_no_response(&path, &()).await
    }

    async fn get_subscription_status(&self) -> Result<SubscriptionStatus, ApiError> {
        let resp: SubscriptionStatusResponse = fetch_json("/api/subscription/status").await?;
        Ok(resp.status)
    }

    async fn create_checkout_session(&self, plan: Plan) -> Result<String, ApiError> {
        let resp: RedirectResponse =
            post_json("/api/subscription/checkout", &CheckoutRequest { plan }).await?;
        Ok(resp.url)
    }

    async fn create_portal_session(&self) -> Result<String, ApiError> {
        let resp: RedirectResponse = post_json("/api/subscription/portal", &()).await?;
        Ok(resp.url)
    }

    async fn admin_grant_premium(
        &self,
        user_id: &str,
        secret: &str,
        note: Option<&str>,
    ) -> Result<(), ApiError> {
        let body = AdminGrantRequest { user_id, secret, note };
        post_json_no_response("/api/subscription/admin/grant", &body).await
    }

    async fn admin_revoke_premium(&self, user_id: &str, secret: &str) -> Result<(), ApiError> {
        let body = AdminRevokeRequest { user_id, secret };
        post_json_no_response("/api/subscription/admin/revoke", &body).await
    }
}

/// Persist the credential pair from an auth response, returning the user.
fn remember_tokens(resp: AuthResponse) -> User {
    if let (Some(access), Some(refresh)) = (&resp.access_token, &resp.refresh_token) {
        BrowserTokens.store(access, refresh);
    }
    resp.user
}

// =============================================================================
// Client-side fetch helpers
// =============================================================================

/// Error body shape the API uses for non-2xx responses.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
}

#[cfg(target_arch = "wasm32")]
fn js_err(e: wasm_bindgen::JsValue) -> ApiError {
    ApiError::Network(format!("{:?}", e))
}

/// Issue a request with JSON headers and the bearer token, mapping non-2xx
/// responses to [`ApiError::Api`].
#[cfg(target_arch = "wasm32")]
async fn request(
    method: &str,
    path: &str,
    body: Option<String>,
) -> Result<web_sys::Response, ApiError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Headers, Request, RequestInit, Response};

    let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".into()))?;

    let headers = Headers::new().map_err(js_err)?;
    headers
        .set("Content-Type", "application/json")
        .map_err(js_err)?;
    if let Some(token) = BrowserTokens.access_token() {
        headers
            .set("Authorization", &format!("Bearer {token}"))
            .map_err(js_err)?;
    }

    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_headers(&headers);
    if let Some(body) = body {
        opts.set_body(&wasm_bindgen::JsValue::from_str(&body));
    }

    let url = format!("{}{}", super::config::api_base(), path);
    let request = Request::new_with_str_and_init(&url, &opts).map_err(js_err)?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_err)?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| ApiError::Network("not a Response".into()))?;

    if !resp.ok() {
        return Err(error_from_response(&resp).await);
    }
    Ok(resp)
}

#[cfg(target_arch = "wasm32")]
async fn error_from_response(resp: &web_sys::Response) -> ApiError {
    use wasm_bindgen_futures::JsFuture;

    let fallback = ApiError::Api(format!("request failed ({})", resp.status()));
    let Ok(promise) = resp.json() else {
        return fallback;
    };
    let Ok(value) = JsFuture::from(promise).await else {
        return fallback;
    };
    match serde_wasm_bindgen::from_value::<ErrorBody>(value) {
        Ok(body) if !body.error.is_empty() => ApiError::Api(body.error),
        _ => fallback,
    }
}

#[cfg(target_arch = "wasm32")]
async fn decode_json<T: for<'de> Deserialize<'de>>(resp: web_sys::Response) -> Result<T, ApiError> {
    use wasm_bindgen_futures::JsFuture;

    let json = JsFuture::from(resp.json().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    serde_wasm_bindgen::from_value(json).map_err(|e| ApiError::Decode(format!("{e}")))
}

/// Fetch JSON from an API path (client-side only)
#[cfg(target_arch = "wasm32")]
pub async fn fetch_json<T: for<'de> Deserialize<'de>>(path: &str) -> Result<T, ApiError> {
    let resp = request("GET", path, None).await?;
    decode_json(resp).await
}

/// POST JSON to an API path and decode the response (client-side only)
#[cfg(target_arch = "wasm32")]
pub async fn post_json<B: Serialize, T: for<'de> Deserialize<'de>>(
    path: &str,
    body: &B,
) -> Result<T, ApiError> {
    let body = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    let resp = request("POST", path, Some(body)).await?;
    decode_json(resp).await
}

/// POST JSON without expecting a response body
#[cfg(target_arch = "wasm32")]
pub async fn post_json_no_response<B: Serialize>(path: &str, body: &B) -> Result<(), ApiError> {
    let body = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    request("POST", path, Some(body)).await?;
    Ok(())
}

/// SSR stub - returns error (should not be called during SSR)
#[cfg(not(target_arch = "wasm32"))]
pub async fn fetch_json<T: for<'de> Deserialize<'de>>(_path: &str) -> Result<T, ApiError> {
    Err(ApiError::Network(
        "fetch_json is only available in browser".to_string(),
    ))
}

/// SSR stub - returns error (should not be called during SSR)
#[cfg(not(target_arch = "wasm32"))]
pub async fn post_json<B: Serialize, T: for<'de> Deserialize<'de>>(
    _path: &str,
    _body: &B,
) -> Result<T, ApiError> {
    Err(ApiError::Network(
        "post_json is only available in browser".to_string(),
    ))
}

/// SSR stub - returns error (should not be called during SSR)
#[cfg(not(target_arch = "wasm32"))]
pub async fn post_json_no_response<B: Serialize>(_path: &str, _body: &B) -> Result<(), ApiError> {
    Err(ApiError::Network(
        "post_json_no_response is only available in browser".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_decode_defaults_missing_fields() {
        // New users can come back with a nearly empty stats payload
        let stats: UserStats = serde_json::from_str(r#"{"xp": 120, "level": 2}"#).unwrap();
        assert_eq!(stats.xp, 120);
        assert_eq!(stats.energy, 0);
        assert_eq!(stats.streak.current_streak, 0);
        assert!(stats.achievements.is_empty());
    }

    #[test]
    fn stats_decode_camel_case_payload() {
        let payload = r#"{
            "xp": 350,
            "level": 3,
            "xpForCurrentLevel": 300,
            "xpForNextLevel": 600,
            "energy": 3,
            "energyMax": 5,
            "msUntilNextEnergyRefill": 90000,
            "streak": {"currentStreak": 4, "lastActivityDate": "2026-08-07"},
            "streakFreezes": 1,
            "dailyGoal": 30,
            "completedLessons": 17,
            "achievements": ["first-lesson"]
        }"#;
        let stats: UserStats = serde_json::from_str(payload).unwrap();
        assert_eq!(stats.xp_for_next_level, 600);
        assert_eq!(stats.ms_until_next_energy_refill, 90_000);
        assert_eq!(stats.streak.last_activity_date.as_deref(), Some("2026-08-07"));
        assert_eq!(stats.achievements, vec!["first-lesson".to_string()]);
    }

    #[test]
    fn user_premium_flag_is_optional() {
        let user: User =
            serde_json::from_str(r#"{"id": "u1", "name": "Ada", "email": "ada@x.io"}"#).unwrap();
        assert_eq!(user.is_premium, None);

        let user: User = serde_json::from_str(
            r#"{"id": "u1", "name": "Ada", "email": "ada@x.io", "isPremium": true}"#,
        )
        .unwrap();
        assert_eq!(user.is_premium, Some(true));
    }

    #[test]
    fn auth_response_tolerates_missing_tokens() {
        let resp: AuthResponse = serde_json::from_str(
            r#"{"user": {"id": "u1", "name": "Ada", "email": "ada@x.io"}}"#,
        )
        .unwrap();
        assert!(resp.access_token.is_none());
    }
}
