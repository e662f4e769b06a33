//! Report-producing runner over the checks in [`crate::checks`].
//!
//! [`run_conformance_suite`] calls a factory for a fresh resource per
//! startup check, plus one more that the baseline-setting checks share.
//! [`run_live_suite`] reuses one resource in whatever state it is in and
//! only runs the checks that establish their own baseline.
//!
//! ```ignore
//! use plugtest_conformance::{run_conformance_suite, LocalResource};
//!
//! #[tokio::test]
//! async fn local_conformance() {
//!     let report = run_conformance_suite(|| async { LocalResource::new() }).await;
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

use std::fmt;
use std::future::Future;

use serde::Serialize;

use crate::checks::{
    content, if_match, none_match, stable_get, startup, stateless, tag_length, validation,
};
use crate::traits::TestableResource;

/// Result of a single conformance check.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    /// Check category (e.g. "get", "put", "startup").
    pub category: String,
    /// Check name (e.g. "validate_then_rotate").
    pub name: String,
    pub passed: bool,
    /// First deviation observed, if the check failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TestResult {
    fn from_result(category: &str, name: &str, result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self {
                category: category.to_string(),
                name: name.to_string(),
                passed: true,
                message: None,
            },
            Err(msg) => Self {
                category: category.to_string(),
                name: name.to_string(),
                passed: false,
                message: Some(msg),
            },
        }
    }
}

/// Aggregated report from a suite run.
#[derive(Debug, Clone, Serialize)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl ConformanceReport {
    fn from_results(results: Vec<TestResult>) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        let total = results.len();
        Self {
            results,
            passed,
            failed: total - passed,
            total,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in &self.results {
            if !r.passed {
                writeln!(
                    f,
                    "  FAIL [{}/{}]: {}",
                    r.category,
                    r.name,
                    r.message.as_deref().unwrap_or("(no message)")
                )?;
            }
        }
        Ok(())
    }
}

/// Runs `$check(resource)` and records the outcome under `$category/$name`.
macro_rules! record {
    ($results:ident, $category:expr, $name:expr, $check:expr) => {{
        let result = $check.await;
        match &result {
            Ok(()) => tracing::debug!(category = $category, name = $name, "check passed"),
            Err(msg) => {
                tracing::warn!(category = $category, name = $name, %msg, "check failed")
            }
        }
        $results.push(TestResult::from_result($category, $name, result));
    }};
}

/// Checks that set up their own baseline, run against `resource`.
async fn run_stateful_checks<R: TestableResource>(resource: &R, results: &mut Vec<TestResult>) {
    record!(
        results,
        "get",
        "stable_without_validation",
        stable_get::check_stable_without_validation(resource)
    );
    record!(
        results,
        "get",
        "validate_then_rotate",
        validation::check_validate_then_rotate(resource)
    );
    record!(
        results,
        "get",
        "rotation_precedes_comparison",
        validation::check_rotation_precedes_comparison(resource)
    );
    record!(
        results,
        "get",
        "content_payload",
        content::check_content_payload(resource)
    );
    record!(
        results,
        "put",
        "tag_length_bound",
        tag_length::check_tag_length_bound(resource)
    );
    record!(
        results,
        "put",
        "none_match_alternation",
        none_match::check_none_match_alternation(resource)
    );
    record!(
        results,
        "put",
        "none_match_ignores_tag_state",
        none_match::check_none_match_ignores_tag_state(resource)
    );
    record!(
        results,
        "put",
        "matching_if_match",
        if_match::check_matching_if_match(resource)
    );
    record!(
        results,
        "put",
        "stale_if_match",
        if_match::check_stale_if_match(resource)
    );
    record!(
        results,
        "put",
        "unconditional_put",
        if_match::check_unconditional_put(resource)
    );
    record!(
        results,
        "stateless",
        "post_delete_keep_tag",
        stateless::check_post_delete_keep_tag(resource)
    );
    record!(
        results,
        "stateless",
        "post_delete_keep_pending",
        stateless::check_post_delete_keep_pending(resource)
    );
}

/// Run every check against resources created by `factory`.
pub async fn run_conformance_suite<R, F, Fut>(factory: F) -> ConformanceReport
where
    R: TestableResource,
    F: Fn() -> Fut,
    Fut: Future<Output = R>,
{
    let mut results = Vec::new();

    record!(
        results,
        "startup",
        "startup_scenario",
        startup::check_startup_scenario(&factory().await)
    );
    record!(
        results,
        "startup",
        "placeholder_never_validates",
        startup::check_placeholder_never_validates(&factory().await)
    );
    record!(
        results,
        "startup",
        "first_none_match_created",
        startup::check_first_none_match_created(&factory().await)
    );

    let resource = factory().await;
    run_stateful_checks(&resource, &mut results).await;

    ConformanceReport::from_results(results)
}

/// Run the state-independent checks in sequence against a live resource.
pub async fn run_live_suite<R: TestableResource>(resource: &R) -> ConformanceReport {
    let mut results = Vec::new();
    run_stateful_checks(resource, &mut results).await;
    ConformanceReport::from_results(results)
}
