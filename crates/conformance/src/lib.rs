//! Conformance suite for the conditional-request plugtest resource.
//!
//! Provides a `TestableResource` trait, a set of behavioral checks, a
//! report-producing runner, and the `plugtest_conformance_tests!` macro
//! that turns the checks into `#[tokio::test]` functions for any
//! implementation.

pub mod checks;
pub mod local;
pub mod report;
pub mod suite;
pub mod traits;

pub use local::LocalResource;
pub use report::{run_conformance_suite, run_live_suite, ConformanceReport, TestResult};
pub use traits::*;
