//! Shared test utilities used across metric-guard crates.

pub mod ci;
pub mod tracing;
