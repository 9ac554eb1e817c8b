//! Premium page: subscription status, checkout, billing portal, admin grants.
//!
//! Subscription status is fetched on every mount and reconciled with the
//! session user's premium flag. Checkout and the billing portal are opaque
//! redirects; the payment provider returns here with `success`/`canceled`
//! query flags that drive the banner.

use dioxus::prelude::*;

use crate::app::api::{Api, HttpApi};
use crate::app::components::{ErrorAlert, Layout};
use crate::app::guard::RequireAuth;
use crate::app::session::use_session;
use crate::app::subscription::{
    resolve_premium, status_label, CheckoutBanner, Plan, SubscriptionStatus,
};

#[component]
pub fn Premium() -> Element {
    rsx! {
        RequireAuth {
            Layout {
                title: "Premium".to_string(),
                nav_active: "premium".to_string(),
                PremiumView {}
            }
        }
    }
}

#[component]
fn PremiumView() -> Element {
    let session = use_session();
    let mut status = use_signal(|| None::<SubscriptionStatus>);
    let mut status_pending = use_signal(|| true);
    let mut banner = use_signal(CheckoutBanner::default);
    let mut redirect_busy = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    // Fetch status on mount; a checkout success additionally refreshes stats
    // so a just-created trial shows up everywhere at once
    use_effect(move || {
        let flags = read_checkout_flags();
        banner.set(flags);
        spawn(async move {
            if flags == CheckoutBanner::Success {
                let (_, fetched) = futures::join!(
                    session.refresh_stats(),
                    HttpApi.get_subscription_status()
                );
                status.set(fetched.ok());
            } else {
                status.set(HttpApi.get_subscription_status().await.ok());
            }
            status_pending.set(false);
        });
    });

    let dismiss_banner = move |_| {
        clear_checkout_flags();
        banner.set(CheckoutBanner::None);
    };

    let mut start_checkout = move |plan: Plan| {
        if redirect_busy() {
            return;
        }
        redirect_busy.set(true);
        error.set(None);
        spawn(async move {
            match HttpApi.create_checkout_session(plan).await {
                // Full navigation; stay disabled while the page unloads
                Ok(url) => redirect_to(&url),
                Err(err) => {
                    error.set(Some(err.to_string()));
                    redirect_busy.set(false);
                }
            }
        });
    };

    let open_portal = move |_| {
        if redirect_busy() {
            return;
        }
        redirect_busy.set(true);
        error.set(None);
        spawn(async move {
            match HttpApi.create_portal_session().await {
                Ok(url) => redirect_to(&url),
                Err(err) => {
                    error.set(Some(err.to_string()));
                    redirect_busy.set(false);
                }
            }
        });
    };

    let user = session.user();
    let status_now = status.read().clone();
    let premium = resolve_premium(user.as_ref(), status_now.as_ref());
    let (label, badge_class) = status_label(status_now.as_ref().map(|s| s.status));

    rsx! {
        h1 { "Bloom Premium" }

        if banner() == CheckoutBanner::Success {
            div { class: "alert alert-success",
                "🎉 Welcome to Premium! Your subscription is active."
                button { class: "btn btn-ghost btn-sm", onclick: dismiss_banner, "×" }
            }
        }
        if banner() == CheckoutBanner::Canceled {
            div { class: "alert alert-info",
                "Checkout canceled — no charge was made."
                button { class: "btn btn-ghost btn-sm", onclick: dismiss_banner, "×" }
            }
        }
        if let Some(message) = error() {
            ErrorAlert {
                message,
                on_dismiss: move |_| error.set(None),
            }
        }

        section { id: "subscription-status",
            h2 { "Your plan" }
            if status_pending() {
                article { aria_busy: "true", "Checking subscription…" }
            } else {
                article { class: "status-card",
                    p {
                        span { class: "{badge_class}", "{label}" }
                        if let Some(plan_label) = status_now.as_ref().and_then(|s| s.plan).map(|p| p.label()) {
                            span { class: "text-muted", " · {plan_label}" }
                        }
                    }
                    if let Some(trial_end) = status_now.as_ref().and_then(|s| s.trial_end.clone()) {
                        p { class: "text-muted", "Trial ends {trial_end}" }
                    }
                    if let Some(period_end) = status_now.as_ref().and_then(|s| s.current_period_end.clone()) {
                        if status_now.as_ref().is_some_and(|s| s.cancel_at_period_end) {
                            p { class: "text-muted", "Cancels on {period_end}" }
                        } else {
                            p { class: "text-muted", "Renews on {period_end}" }
                        }
                    }
                    if status_now.as_ref().and_then(|s| s.granted_by.as_deref()) == Some("admin") {
                        p { class: "text-muted", "Complimentary access granted by the Bloom team" }
                    }
                }
            }
        }

        if premium {
            section { id: "manage",
                h2 { "Manage" }
                button {
                    class: "btn",
                    disabled: redirect_busy(),
                    onclick: open_portal,
                    if redirect_busy() { "Opening…" } else { "Manage billing" }
                }
            }
        } else {
            section { id: "plans",
                h2 { "Go Premium" }
                p { "Unlock every course, unlimited energy, and streak repair." }
                div { class: "plan-grid",
                    article { class: "plan-card",
                        h3 { "Monthly" }
                        p { class: "plan-price", "$9.99/mo" }
                        button {
                            class: "btn btn-primary",
                            disabled: redirect_busy(),
                            onclick: move |_| start_checkout(Plan::Monthly),
                            "Start monthly"
                        }
                    }
                    article { class: "plan-card",
                        h3 { "Yearly" }
                        p { class: "plan-price", "$79.99/yr" }
                        small { class: "badge badge-ok", "2 months free" }
                        button {
                            class: "btn btn-primary",
                            disabled: redirect_busy(),
                            onclick: move |_| start_checkout(Plan::Yearly),
                            "Start yearly"
                        }
                    }
                }
            }
        }

        AdminPanel { status, status_pending }
    }
}

/// Grant/revoke pass-through for support staff.
///
/// No local permission model: anyone can attempt the call with a shared
/// secret and the API enforces authorization.
#[component]
fn AdminPanel(
    status: Signal<Option<SubscriptionStatus>>,
    status_pending: Signal<bool>,
) -> Element {
    let mut target_user = use_signal(String::new);
    let mut secret = use_signal(String::new);
    let mut note = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut outcome = use_signal(|| None::<String>);
    let mut error = use_signal(|| None::<String>);
    let mut status = status;
    let mut status_pending = status_pending;

    let mut run = move |revoke: bool| {
        if busy() {
            return;
        }
        busy.set(true);
        outcome.set(None);
        error.set(None);
        let user_id = target_user.peek().trim().to_string();
        let secret_now = secret.peek().clone();
        let note_now = note.peek().trim().to_string();
        spawn(async move {
            let result = if revoke {
                HttpApi.admin_revoke_premium(&user_id, &secret_now).await
            } else {
                let note_opt = (!note_now.is_empty()).then_some(note_now.as_str());
                HttpApi
                    .admin_grant_premium(&user_id, &secret_now, note_opt)
                    .await
            };
            match result {
                Ok(()) => {
                    let verb = if revoke { "Revoked" } else { "Granted" };
                    outcome.set(Some(format!("{verb} premium for {user_id}")));
                    // Pick up the new premium state
                    status_pending.set(true);
                    status.set(HttpApi.get_subscription_status().await.ok());
                    status_pending.set(false);
                }
                Err(err) => error.set(Some(err.to_string())),
            }
            busy.set(false);
        });
    };

    rsx! {
        details { id: "admin",
            summary { "Admin tools" }
            if let Some(message) = outcome() {
                div { class: "alert alert-success", "{message}" }
            }
            if let Some(message) = error() {
                ErrorAlert {
                    message,
                    on_dismiss: move |_| error.set(None),
                }
            }
            label { "User id"
                input {
                    r#type: "text",
                    value: "{target_user}",
                    oninput: move |e| target_user.set(e.value()),
                }
            }
            label { "Shared secret"
                input {
                    r#type: "password",
                    value: "{secret}",
                    oninput: move |e| secret.set(e.value()),
                }
            }
            label { "Note (optional)"
                input {
                    r#type: "text",
                    value: "{note}",
                    oninput: move |e| note.set(e.value()),
                }
            }
            div { class: "admin-actions",
                button {
                    class: "btn",
                    disabled: busy(),
                    onclick: move |_| run(false),
                    "Grant premium"
                }
                button {
                    class: "btn btn-danger",
                    disabled: busy(),
                    onclick: move |_| run(true),
                    "Revoke premium"
                }
            }
        }
    }
}

// ============ WASM-only helpers ============

/// Read the payment provider's return flags from the URL query.
#[cfg(target_arch = "wasm32")]
fn read_checkout_flags() -> CheckoutBanner {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .map(|s| crate::app::subscription::banner_from_query(&s))
        .unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
fn read_checkout_flags() -> CheckoutBanner {
    CheckoutBanner::None
}

/// Strip the checkout flags from the URL without a navigation.
#[cfg(target_arch = "wasm32")]
fn clear_checkout_flags() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let (Ok(path), Ok(history)) = (window.location().pathname(), window.history()) else {
        return;
    };
    let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&path));
}

#[cfg(not(target_arch = "wasm32"))]
fn clear_checkout_flags() {}

/// Full navigation to a provider-owned URL.
#[cfg(target_arch = "wasm32")]
fn redirect_to(url: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(url);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn redirect_to(url: &str) {
    tracing::debug!("redirect skipped outside browser: {url}");
}
