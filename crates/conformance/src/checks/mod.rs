//! Behavioral checks, one module per observable guarantee.
//!
//! Every check returns `Err(message)` describing the first deviation it
//! sees. Checks in [`startup`] assume a freshly created resource; every
//! other check establishes its own baseline and can run against a live
//! resource in any state.

pub mod content;
pub mod if_match;
pub mod none_match;
pub mod stable_get;
pub mod startup;
pub mod stateless;
pub mod tag_length;
pub mod validation;

use plugtest_core::{ETag, Request, Response, ResponseCode};

use crate::traits::TestableResource;

pub(crate) async fn send<R: TestableResource>(
    resource: &R,
    request: Request,
) -> Result<Response, String> {
    resource
        .exchange(&request)
        .await
        .map_err(|e| format!("{} exchange failed: {}", request.method, e))
}

pub(crate) fn expect_code(
    context: &str,
    response: &Response,
    expected: ResponseCode,
) -> Result<(), String> {
    if response.code != expected {
        return Err(format!(
            "{}: expected {}, got {}",
            context, expected, response.code
        ));
    }
    Ok(())
}

pub(crate) fn expect_tag(context: &str, response: &Response) -> Result<ETag, String> {
    response
        .etag
        .ok_or_else(|| format!("{}: response carries no ETag", context))
}

/// A plain GET, returning the tag it reports.
///
/// Any pending rotation is consumed by this GET, so the returned tag stays
/// current until the next tag-changing request.
pub(crate) async fn settled_tag<R: TestableResource>(resource: &R) -> Result<ETag, String> {
    let res = send(resource, Request::get()).await?;
    expect_code("baseline GET", &res, ResponseCode::Content)?;
    expect_tag("baseline GET", &res)
}

/// Same length as `tag`, last byte differs.
pub(crate) fn stale_variant(tag: &ETag) -> Vec<u8> {
    let mut bytes = tag.as_bytes().to_vec();
    if let Some(last) = bytes.last_mut() {
        *last ^= 0x80;
    }
    bytes
}
