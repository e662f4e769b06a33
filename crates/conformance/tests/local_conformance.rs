//! The in-process resource run through the full conformance suite, both
//! via the generated tests and via the report runner.

use std::sync::Arc;

use plugtest_conformance::{
    plugtest_conformance_tests, run_conformance_suite, run_live_suite, LocalResource,
    TestableResource,
};
use plugtest_core::{Request, ResponseCode};

plugtest_conformance_tests!(LocalResource::seeded(0xc0a9));

#[tokio::test]
async fn full_suite_reports_no_failures() {
    let report = run_conformance_suite(|| async { LocalResource::new() }).await;
    assert!(report.is_success(), "{report}");
    assert_eq!(report.total, report.results.len());
    assert!(report.results.iter().any(|r| r.category == "startup"));
}

#[tokio::test]
async fn live_suite_tolerates_prior_traffic() {
    let resource = LocalResource::seeded(3);
    // Leave the resource dirty and mid-alternation before the run.
    let tag = resource
        .exchange(&Request::get())
        .await
        .unwrap()
        .etag
        .unwrap();
    resource
        .exchange(&Request::get().with_etag(tag))
        .await
        .unwrap();
    resource
        .exchange(&Request::put().with_if_none_match())
        .await
        .unwrap();

    let report = run_live_suite(&resource).await;
    assert!(report.is_success(), "{report}");
    assert!(report.results.iter().all(|r| r.category != "startup"));
}

#[tokio::test]
async fn small_buffer_still_conforms() {
    let report = run_conformance_suite(|| async { LocalResource::new().with_capacity(5) }).await;
    assert!(report.is_success(), "{report}");
    let resource = LocalResource::new().with_capacity(5);
    let res = resource.exchange(&Request::get()).await.unwrap();
    assert_eq!(res.payload(), b"Type:");
}

#[tokio::test]
async fn zero_capacity_buffer_still_conforms() {
    let report = run_conformance_suite(|| async { LocalResource::seeded(1).with_capacity(0) }).await;
    assert!(report.is_success(), "{report}");
    let resource = LocalResource::seeded(1).with_capacity(0);
    let res = resource.exchange(&Request::get()).await.unwrap();
    assert_eq!(res.code, ResponseCode::Content);
    assert!(res.payload().is_empty());
    assert!(res.etag.is_some());
}

#[tokio::test]
async fn concurrent_validations_serialize() {
    let resource = Arc::new(LocalResource::seeded(21));
    let tag = resource
        .exchange(&Request::get())
        .await
        .unwrap()
        .etag
        .unwrap();

    // Many clients validate the same tag at once. The first one in wins a
    // Valid; the GET right after it rotates, so every later validation
    // against the old tag sees Content.
    let mut handles = Vec::new();
    for _ in 0..16 {
        let resource = Arc::clone(&resource);
        handles.push(tokio::spawn(async move {
            resource
                .exchange(&Request::get().with_etag(tag))
                .await
                .unwrap()
                .code
        }));
    }
    let mut valid = 0;
    for handle in handles {
        if handle.await.unwrap() == ResponseCode::Valid {
            valid += 1;
        }
    }
    assert_eq!(valid, 1);

    let state = resource.state().await;
    assert_ne!(state.tag(), &tag);
}

#[tokio::test]
async fn concurrent_none_match_puts_split_evenly() {
    let resource = Arc::new(LocalResource::seeded(22));
    let mut handles = Vec::new();
    for _ in 0..32 {
        let resource = Arc::clone(&resource);
        handles.push(tokio::spawn(async move {
            resource
                .exchange(&Request::put().with_if_none_match())
                .await
                .unwrap()
                .code
        }));
    }
    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap() == ResponseCode::Created {
            created += 1;
        }
    }
    assert_eq!(created, 16);
    assert!(resource.state().await.none_match_succeeds());
}
