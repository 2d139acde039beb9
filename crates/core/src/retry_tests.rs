// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use yare::parameterized;

const INTERVAL: Duration = Duration::from_secs(10);

#[parameterized(
    no_failures = { 0 },
    one_failure = { 1 },
    many_failures = { 50 },
)]
fn fixed_policy_ignores_failures(failures: u32) {
    assert_eq!(RetryPolicy::Fixed.delay(INTERVAL, failures), INTERVAL);
}

#[parameterized(
    healthy = { 0, 10 },
    first_failure = { 1, 20 },
    second_failure = { 2, 40 },
    third_failure = { 3, 80 },
    capped = { 5, 120 },
    overflow_is_capped = { 200, 120 },
)]
fn backoff_doubles_until_capped(failures: u32, expected_secs: u64) {
    let policy = RetryPolicy::backoff(2, Duration::from_secs(120));
    assert_eq!(
        policy.delay(INTERVAL, failures),
        Duration::from_secs(expected_secs)
    );
}

#[test]
fn backoff_cap_below_interval_keeps_interval() {
    let policy = RetryPolicy::backoff(2, Duration::from_secs(1));
    assert_eq!(policy.delay(INTERVAL, 3), INTERVAL);
}

#[test]
fn policy_parses_from_toml_style_json() {
    let policy: RetryPolicy =
        serde_json::from_str(r#"{"kind":"backoff","multiplier":3,"max":"5m"}"#).unwrap();
    assert_eq!(policy, RetryPolicy::backoff(3, Duration::from_secs(300)));

    let policy: RetryPolicy = serde_json::from_str(r#"{"kind":"backoff"}"#).unwrap();
    assert_eq!(policy, RetryPolicy::backoff(2, Duration::from_secs(300)));

    let policy: RetryPolicy = serde_json::from_str(r#"{"kind":"fixed"}"#).unwrap();
    assert_eq!(policy, RetryPolicy::Fixed);
}

proptest! {
    #[test]
    fn backoff_stays_between_interval_and_cap(
        multiplier in 0u32..10,
        max_secs in 0u64..3600,
        failures in 0u32..1000,
    ) {
        let max = Duration::from_secs(max_secs);
        let delay = RetryPolicy::backoff(multiplier, max).delay(INTERVAL, failures);

        prop_assert!(delay >= INTERVAL);
        prop_assert!(delay <= max.max(INTERVAL));
    }

    #[test]
    fn backoff_never_shrinks_as_failures_grow(failures in 0u32..64) {
        let policy = RetryPolicy::backoff(2, Duration::from_secs(3600));
        prop_assert!(policy.delay(INTERVAL, failures) <= policy.delay(INTERVAL, failures + 1));
    }
}
