//! Shared test utilities for `metric-guard-core`.

use metric_guard_test_support::ci::case_budget::case_budget;
use proptest::test_runner::Config as ProptestConfig;

/// Proptest configuration honouring the `PROPTEST_CASES` override.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    ProptestConfig::with_cases(case_budget(default_cases))
}
