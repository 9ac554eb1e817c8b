//! Source-lint tests for invariants the type system can't express.
//!
//! Test strategy mirrors the unit suites: these are a first line of defense
//! against regressions that would be easy to miss in review.

use std::fs;

/// The derived-metrics module is pure display math over fetched snapshots.
/// It must never reach for the API client.
#[test]
fn metrics_module_performs_no_fetches() {
    let src =
        fs::read_to_string("src/app/metrics.rs").expect("Failed to read src/app/metrics.rs");

    for needle in ["fetch_json", "post_json", "HttpApi"] {
        assert!(
            !src.contains(needle),
            "REGRESSION: src/app/metrics.rs references '{}'.\n\
             Derived metrics must stay pure functions over primitives.",
            needle
        );
    }
}

/// The energy countdown is a local clock counting down the last-fetched
/// snapshot. It drifts until the next explicit stats refresh; the tick must
/// never turn into a poller.
#[test]
fn countdown_tick_does_not_call_the_api() {
    let src = fs::read_to_string("src/app/components/stats.rs")
        .expect("Failed to read src/app/components/stats.rs");

    assert!(
        src.contains("set_interval"),
        "Expected the countdown to run on a local interval timer"
    );
    for needle in ["fetch_json", "post_json", "get_user_stats", "HttpApi"] {
        assert!(
            !src.contains(needle),
            "REGRESSION: src/app/components/stats.rs references '{}'.\n\
             The countdown only decrements the last-fetched snapshot.",
            needle
        );
    }
}

/// The session store propagates or explicitly swallows every failure;
/// panicking paths would take down the whole client.
#[test]
fn session_store_never_unwraps() {
    let src =
        fs::read_to_string("src/app/session.rs").expect("Failed to read src/app/session.rs");
    let body = src.split("#[cfg(test)]").next().unwrap_or(&src);

    assert!(
        !body.contains(".unwrap()"),
        "REGRESSION: .unwrap() in non-test session code"
    );
    assert!(
        !body.contains(".expect("),
        "REGRESSION: .expect() in non-test session code"
    );
}
