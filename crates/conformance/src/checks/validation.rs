//! A validating GET is answered 2.03 and forces the next GET to rotate.

use plugtest_core::{Request, ResponseCode};

use super::{expect_code, expect_tag, send, settled_tag};
use crate::traits::TestableResource;

/// GET with the current tag returns Valid and echoes it; the GET after it
/// sees a new tag.
pub async fn check_validate_then_rotate<R: TestableResource>(resource: &R) -> Result<(), String> {
    let tag = settled_tag(resource).await?;

    let valid = send(resource, Request::get().with_etag(tag)).await?;
    expect_code("validating GET", &valid, ResponseCode::Valid)?;
    let echoed = expect_tag("validating GET", &valid)?;
    if echoed != tag {
        return Err(format!(
            "validating GET echoed {} instead of {}",
            echoed, tag
        ));
    }
    if !valid.payload().is_empty() {
        return Err("validating GET carried a payload".to_string());
    }

    let next = send(resource, Request::get()).await?;
    expect_code("GET after validation", &next, ResponseCode::Content)?;
    let rotated = expect_tag("GET after validation", &next)?;
    if rotated == tag {
        return Err(format!("GET after validation still reports {}", tag));
    }
    Ok(())
}

/// The rotation after a validation happens even when the client presents
/// the tag it just validated: that GET is answered Content, not Valid.
pub async fn check_rotation_precedes_comparison<R: TestableResource>(
    resource: &R,
) -> Result<(), String> {
    let tag = settled_tag(resource).await?;

    let valid = send(resource, Request::get().with_etag(tag)).await?;
    expect_code("validating GET", &valid, ResponseCode::Valid)?;

    let again = send(resource, Request::get().with_etag(tag)).await?;
    expect_code("second GET with the same tag", &again, ResponseCode::Content)?;
    let rotated = expect_tag("second GET with the same tag", &again)?;
    if rotated == tag {
        return Err("second GET with the same tag did not rotate".to_string());
    }

    // The new tag validates in turn.
    let revalid = send(resource, Request::get().with_etag(rotated)).await?;
    expect_code("validating the rotated tag", &revalid, ResponseCode::Valid)
}
