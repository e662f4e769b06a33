//! POST and DELETE never touch the resource state.

use plugtest_core::{Request, ResponseCode, CREATED_LOCATION};

use super::{expect_code, expect_tag, send, settled_tag};
use crate::traits::TestableResource;

const REPEATS: usize = 5;

async fn post_and_delete<R: TestableResource>(resource: &R) -> Result<(), String> {
    for _ in 0..REPEATS {
        let post = send(resource, Request::post()).await?;
        expect_code("POST", &post, ResponseCode::Created)?;
        if post.location_path.as_deref() != Some(CREATED_LOCATION) {
            return Err(format!(
                "POST location was {:?}, expected {}",
                post.location_path, CREATED_LOCATION
            ));
        }
        if post.etag.is_some() {
            return Err("POST attached an ETag".to_string());
        }

        let delete = send(resource, Request::delete()).await?;
        expect_code("DELETE", &delete, ResponseCode::Deleted)?;
        if delete.etag.is_some() {
            return Err("DELETE attached an ETag".to_string());
        }
    }
    Ok(())
}

/// Tag and If-None-Match phase are the same before and after a burst of
/// POST and DELETE requests.
pub async fn check_post_delete_keep_tag<R: TestableResource>(resource: &R) -> Result<(), String> {
    let tag = settled_tag(resource).await?;
    let phase = send(resource, Request::put().with_if_none_match())
        .await?
        .code;

    post_and_delete(resource).await?;

    let after = settled_tag(resource).await?;
    if after != tag {
        return Err(format!(
            "tag changed from {} to {} across POST/DELETE",
            tag, after
        ));
    }

    let next_phase = send(resource, Request::put().with_if_none_match())
        .await?
        .code;
    if next_phase == phase {
        return Err(format!(
            "If-None-Match answered {} twice in a row across POST/DELETE",
            phase
        ));
    }
    Ok(())
}

/// A pending rotation survives POST and DELETE: they neither consume nor
/// cancel it.
pub async fn check_post_delete_keep_pending<R: TestableResource>(
    resource: &R,
) -> Result<(), String> {
    let tag = settled_tag(resource).await?;
    let valid = send(resource, Request::get().with_etag(tag)).await?;
    expect_code("validating GET", &valid, ResponseCode::Valid)?;

    post_and_delete(resource).await?;

    let res = send(resource, Request::get()).await?;
    expect_code("GET after POST/DELETE", &res, ResponseCode::Content)?;
    let rotated = expect_tag("GET after POST/DELETE", &res)?;
    if rotated == tag {
        return Err("pending rotation was lost across POST/DELETE".to_string());
    }
    Ok(())
}
