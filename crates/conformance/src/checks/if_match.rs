//! PUT with If-Match: optimistic concurrency against the current tag.

use plugtest_core::{Request, ResponseCode};

use super::{expect_code, expect_tag, send, settled_tag, stale_variant};
use crate::traits::TestableResource;

/// A matching If-Match yields Changed with a new tag, and leaves the
/// resource dirty so the next GET rotates again.
pub async fn check_matching_if_match<R: TestableResource>(resource: &R) -> Result<(), String> {
    let tag = settled_tag(resource).await?;

    let res = send(resource, Request::put().with_if_match(tag)).await?;
    expect_code("matching If-Match PUT", &res, ResponseCode::Changed)?;
    let changed = expect_tag("matching If-Match PUT", &res)?;
    if changed == tag {
        return Err(format!("matching If-Match PUT kept tag {}", tag));
    }

    let next = send(resource, Request::get()).await?;
    expect_code("GET after If-Match PUT", &next, ResponseCode::Content)?;
    let rotated = expect_tag("GET after If-Match PUT", &next)?;
    if rotated == changed {
        return Err(format!(
            "GET after a matching If-Match PUT still reports {}",
            changed
        ));
    }
    Ok(())
}

/// A non-matching If-Match yields Precondition Failed and changes nothing.
pub async fn check_stale_if_match<R: TestableResource>(resource: &R) -> Result<(), String> {
    let tag = settled_tag(resource).await?;

    let mut overlong = tag.as_bytes().to_vec();
    overlong.resize(9, 0x00);

    for (label, candidate) in [("stale", stale_variant(&tag)), ("overlong", overlong)] {
        let context = format!("{} If-Match PUT", label);
        let res = send(resource, Request::put().with_if_match(&candidate)).await?;
        expect_code(&context, &res, ResponseCode::PreconditionFailed)?;
        if res.etag.is_some() {
            return Err(format!("{} attached an ETag", context));
        }
    }

    let after = settled_tag(resource).await?;
    if after != tag {
        return Err(format!(
            "failed If-Match PUTs changed the tag from {} to {}",
            tag, after
        ));
    }
    Ok(())
}

/// No If-Match (or an empty one) rotates but does not mark the resource
/// dirty: the next GET keeps the new tag.
pub async fn check_unconditional_put<R: TestableResource>(resource: &R) -> Result<(), String> {
    let mut current = settled_tag(resource).await?;

    for (label, request) in [
        ("unconditional PUT", Request::put()),
        ("empty If-Match PUT", Request::put().with_if_match(b"")),
    ] {
        let res = send(resource, request).await?;
        expect_code(label, &res, ResponseCode::Changed)?;
        let changed = expect_tag(label, &res)?;
        if changed == current {
            return Err(format!("{} kept tag {}", label, current));
        }
        let seen = settled_tag(resource).await?;
        if seen != changed {
            return Err(format!(
                "GET after {} reported {} instead of {}",
                label, seen, changed
            ));
        }
        current = changed;
    }
    Ok(())
}
