//! Premium subscription reconciliation.
//!
//! The session user record and the independently fetched subscription status
//! can disagree; [`resolve_premium`] defines the precedence. Checkout and
//! billing-portal flows are opaque redirects owned by the payment provider,
//! which returns the user with `success`/`canceled` query flags parsed by
//! [`banner_from_query`].

use serde::{Deserialize, Serialize};

use super::api::User;

/// Server-reported subscription lifecycle state.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionState {
    Active,
    Trialing,
    PastDue,
    Canceled,
    AdminGranted,
    /// Catch-all for states this client doesn't know about
    #[serde(other)]
    #[default]
    Unknown,
}

/// Billing plan offered at checkout.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Monthly,
    Yearly,
}

impl Plan {
    pub fn label(&self) -> &'static str {
        match self {
            Plan::Monthly => "Monthly",
            Plan::Yearly => "Yearly",
        }
    }
}

/// Subscription record fetched on every premium-view mount; never persisted.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    #[serde(default)]
    pub status: SubscriptionState,
    #[serde(default)]
    pub plan: Option<Plan>,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub trial_end: Option<String>,
    #[serde(default)]
    pub current_period_end: Option<String>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    #[serde(default)]
    pub granted_by: Option<String>,
}

/// Resolve the effective premium flag.
///
/// The user-record flag reflects the latest login/refresh snapshot and wins
/// when present; the subscription record is the fallback, then false.
pub fn resolve_premium(user: Option<&User>, status: Option<&SubscriptionStatus>) -> bool {
    user.and_then(|u| u.is_premium)
        .or_else(|| status.map(|s| s.is_premium))
        .unwrap_or(false)
}

/// Checkout-return banner derived from the URL query flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CheckoutBanner {
    #[default]
    None,
    Success,
    Canceled,
}

/// Parse the location search string (`?success=true&...`).
///
/// The payment provider sets exactly one of the two flags; if both somehow
/// appear, success wins.
pub fn banner_from_query(search: &str) -> CheckoutBanner {
    let query = search.strip_prefix('?').unwrap_or(search);
    let mut canceled = false;
    for pair in query.split('&') {
        let mut parts = pair.splitn(2, '=');
        let key = parts.next().unwrap_or("");
        let value = parts.next().unwrap_or("");
        match key {
            "success" if value == "true" => return CheckoutBanner::Success,
            "canceled" if value == "true" => canceled = true,
            _ => {}
        }
    }
    if canceled {
        CheckoutBanner::Canceled
    } else {
        CheckoutBanner::None
    }
}

/// Label and badge class for a subscription state.
pub fn status_label(state: Option<SubscriptionState>) -> (&'static str, &'static str) {
    match state {
        Some(SubscriptionState::Active) => ("Active", "badge-ok"),
        Some(SubscriptionState::Trialing) => ("Trial", "badge-ok"),
        Some(SubscriptionState::PastDue) => ("Past due", "badge-warn"),
        Some(SubscriptionState::Canceled) => ("Canceled", "badge-err"),
        Some(SubscriptionState::AdminGranted) => ("Granted", "badge-ok"),
        Some(SubscriptionState::Unknown) | None => ("Unknown", "badge-muted"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::api::User;

    fn user(premium: Option<bool>) -> User {
        User {
            id: "u1".into(),
            name: "Ada".into(),
            email: "ada@x.io".into(),
            is_premium: premium,
        }
    }

    fn status(premium: bool) -> SubscriptionStatus {
        SubscriptionStatus {
            is_premium: premium,
            ..Default::default()
        }
    }

    #[test]
    fn user_flag_wins_over_subscription_record() {
        assert!(resolve_premium(
            Some(&user(Some(true))),
            Some(&status(false))
        ));
        assert!(!resolve_premium(
            Some(&user(Some(false))),
            Some(&status(true))
        ));
    }

    #[test]
    fn subscription_record_fills_in_missing_user_flag() {
        assert!(resolve_premium(Some(&user(None)), Some(&status(true))));
        assert!(resolve_premium(None, Some(&status(true))));
    }

    #[test]
    fn defaults_to_not_premium() {
        assert!(!resolve_premium(None, None));
        assert!(!resolve_premium(Some(&user(None)), None));
    }

    #[test]
    fn banner_parses_query_flags() {
        assert_eq!(banner_from_query("?success=true"), CheckoutBanner::Success);
        assert_eq!(
            banner_from_query("?canceled=true"),
            CheckoutBanner::Canceled
        );
        assert_eq!(banner_from_query("?session_id=abc"), CheckoutBanner::None);
        assert_eq!(banner_from_query(""), CheckoutBanner::None);
    }

    #[test]
    fn banner_success_wins_when_both_present() {
        assert_eq!(
            banner_from_query("?canceled=true&success=true"),
            CheckoutBanner::Success
        );
    }

    #[test]
    fn state_decodes_snake_case_and_unknowns() {
        assert_eq!(
            serde_json::from_str::<SubscriptionState>(r#""past_due""#).unwrap(),
            SubscriptionState::PastDue
        );
        assert_eq!(
            serde_json::from_str::<SubscriptionState>(r#""admin_granted""#).unwrap(),
            SubscriptionState::AdminGranted
        );
        assert_eq!(
            serde_json::from_str::<SubscriptionState>(r#""something_new""#).unwrap(),
            SubscriptionState::Unknown
        );
    }

    #[test]
    fn unknown_state_gets_fallback_label() {
        assert_eq!(status_label(None).0, "Unknown");
        assert_eq!(status_label(Some(SubscriptionState::Unknown)).0, "Unknown");
    }

    #[test]
    fn plan_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Plan::Monthly).unwrap(), r#""monthly""#);
        assert_eq!(serde_json::to_string(&Plan::Yearly).unwrap(), r#""yearly""#);
    }
}
