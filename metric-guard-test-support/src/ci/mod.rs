//! Environment-driven configuration for test suites run locally and in CI.

pub mod case_budget;
