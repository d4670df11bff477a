//! Property-test case counts, overridable from the environment.

use std::env;

/// Environment variable overriding the number of cases per property.
pub const CASES_ENV_KEY: &str = "PROPTEST_CASES";

/// Reads the case count for a property suite.
///
/// A missing variable yields `default_cases`. Values that are not a positive
/// integer are logged at `warn` and also yield `default_cases`.
///
/// # Examples
///
/// ```
/// use metric_guard_test_support::ci::case_budget::case_budget;
///
/// assert!(case_budget(32) > 0);
/// ```
#[must_use]
pub fn case_budget(default_cases: u32) -> u32 {
    let Ok(raw) = env::var(CASES_ENV_KEY) else {
        return default_cases;
    };
    match raw.trim().parse::<u32>() {
        Ok(cases) if cases > 0 => cases,
        _ => {
            tracing::warn!(env = CASES_ENV_KEY, raw = %raw, "ignoring case override");
            default_cases
        }
    }
}
