//! Behavior of a freshly created resource. These checks need a resource
//! that has not served any request yet.

use plugtest_core::{ETag, Request, ResponseCode};

use super::{expect_code, expect_tag, send};
use crate::traits::TestableResource;

/// First GET rotates away from the startup placeholder, the client
/// validates that tag, and the GET after the validation sees another one.
pub async fn check_startup_scenario<R: TestableResource>(resource: &R) -> Result<(), String> {
    let first = send(resource, Request::get()).await?;
    expect_code("first GET", &first, ResponseCode::Content)?;
    let t1 = expect_tag("first GET", &first)?;
    if t1 == ETag::placeholder() {
        return Err("first GET handed out the startup placeholder".to_string());
    }

    let valid = send(resource, Request::get().with_etag(t1)).await?;
    expect_code("validating GET", &valid, ResponseCode::Valid)?;
    if expect_tag("validating GET", &valid)? != t1 {
        return Err("validating GET did not echo the first tag".to_string());
    }

    let third = send(resource, Request::get()).await?;
    expect_code("third GET", &third, ResponseCode::Content)?;
    let t2 = expect_tag("third GET", &third)?;
    if t2 == t1 {
        return Err(format!("third GET did not rotate past {}", t1));
    }
    Ok(())
}

/// The startup placeholder never validates: the first GET rotates before
/// comparing.
pub async fn check_placeholder_never_validates<R: TestableResource>(
    resource: &R,
) -> Result<(), String> {
    let res = send(
        resource,
        Request::get().with_etag(ETag::placeholder()),
    )
    .await?;
    expect_code("first GET with the placeholder tag", &res, ResponseCode::Content)
}

/// The first If-None-Match PUT a resource sees is answered Created.
pub async fn check_first_none_match_created<R: TestableResource>(
    resource: &R,
) -> Result<(), String> {
    let res = send(resource, Request::put().with_if_none_match()).await?;
    expect_code("first If-None-Match PUT", &res, ResponseCode::Created)?;
    let res = send(resource, Request::put().with_if_none_match()).await?;
    expect_code(
        "second If-None-Match PUT",
        &res,
        ResponseCode::PreconditionFailed,
    )
}
