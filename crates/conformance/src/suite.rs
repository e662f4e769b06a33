//! The `plugtest_conformance_tests!` macro.
//!
//! Generates one `#[tokio::test]` per check in [`crate::checks`] for any
//! expression producing a [`TestableResource`](crate::TestableResource).
//!
//! # Usage
//!
//! ```rust,ignore
//! use plugtest_conformance::{plugtest_conformance_tests, LocalResource};
//!
//! plugtest_conformance_tests!(LocalResource::seeded(7));
//! ```
//!
//! Generated functions are named `conformance_<check>` and can be run with
//! `cargo test conformance_`.

/// Generate conformance tests for a resource implementation.
///
/// `$resource_expr` is evaluated fresh for each test, so every test starts
/// from a newly created resource and tests can run in any order.
#[macro_export]
macro_rules! plugtest_conformance_tests {
    ($resource_expr:expr) => {
        #[tokio::test]
        async fn conformance_startup_scenario() {
            let resource = $resource_expr;
            $crate::checks::startup::check_startup_scenario(&resource)
                .await
                .expect("startup scenario failed");
        }

        #[tokio::test]
        async fn conformance_placeholder_never_validates() {
            let resource = $resource_expr;
            $crate::checks::startup::check_placeholder_never_validates(&resource)
                .await
                .expect("placeholder validated");
        }

        #[tokio::test]
        async fn conformance_first_none_match_created() {
            let resource = $resource_expr;
            $crate::checks::startup::check_first_none_match_created(&resource)
                .await
                .expect("first If-None-Match PUT was not Created");
        }

        #[tokio::test]
        async fn conformance_stable_without_validation() {
            let resource = $resource_expr;
            $crate::checks::stable_get::check_stable_without_validation(&resource)
                .await
                .expect("non-validating GET changed the tag");
        }

        #[tokio::test]
        async fn conformance_validate_then_rotate() {
            let resource = $resource_expr;
            $crate::checks::validation::check_validate_then_rotate(&resource)
                .await
                .expect("validate-then-rotate failed");
        }

        #[tokio::test]
        async fn conformance_rotation_precedes_comparison() {
            let resource = $resource_expr;
            $crate::checks::validation::check_rotation_precedes_comparison(&resource)
                .await
                .expect("rotation did not precede comparison");
        }

        #[tokio::test]
        async fn conformance_content_payload() {
            let resource = $resource_expr;
            $crate::checks::content::check_content_payload(&resource)
                .await
                .expect("Content response shape failed");
        }

        #[tokio::test]
        async fn conformance_tag_length_bound() {
            let resource = $resource_expr;
            $crate::checks::tag_length::check_tag_length_bound(&resource)
                .await
                .expect("tag length bound failed");
        }

        #[tokio::test]
        async fn conformance_none_match_alternation() {
            let resource = $resource_expr;
            $crate::checks::none_match::check_none_match_alternation(&resource)
                .await
                .expect("If-None-Match alternation failed");
        }

        #[tokio::test]
        async fn conformance_none_match_ignores_tag_state() {
            let resource = $resource_expr;
            $crate::checks::none_match::check_none_match_ignores_tag_state(&resource)
                .await
                .expect("If-None-Match alternation depended on tag state");
        }

        #[tokio::test]
        async fn conformance_matching_if_match() {
            let resource = $resource_expr;
            $crate::checks::if_match::check_matching_if_match(&resource)
                .await
                .expect("matching If-Match failed");
        }

        #[tokio::test]
        async fn conformance_stale_if_match() {
            let resource = $resource_expr;
            $crate::checks::if_match::check_stale_if_match(&resource)
                .await
                .expect("stale If-Match failed");
        }

        #[tokio::test]
        async fn conformance_unconditional_put() {
            let resource = $resource_expr;
            $crate::checks::if_match::check_unconditional_put(&resource)
                .await
                .expect("unconditional PUT failed");
        }

        #[tokio::test]
        async fn conformance_post_delete_keep_tag() {
            let resource = $resource_expr;
            $crate::checks::stateless::check_post_delete_keep_tag(&resource)
                .await
                .expect("POST/DELETE changed state");
        }

        #[tokio::test]
        async fn conformance_post_delete_keep_pending() {
            let resource = $resource_expr;
            $crate::checks::stateless::check_post_delete_keep_pending(&resource)
                .await
                .expect("POST/DELETE affected a pending rotation");
        }
    };
}
