//! PUT with If-None-Match alternates Created / Precondition Failed.

use plugtest_core::{Request, ResponseCode};

use super::{send, settled_tag};
use crate::traits::TestableResource;

const ROUNDS: usize = 8;

fn opposite(code: ResponseCode) -> ResponseCode {
    match code {
        ResponseCode::Created => ResponseCode::PreconditionFailed,
        _ => ResponseCode::Created,
    }
}

/// Successive If-None-Match PUTs alternate, starting from whichever
/// outcome the resource is currently due to give.
pub async fn check_none_match_alternation<R: TestableResource>(
    resource: &R,
) -> Result<(), String> {
    let first = send(resource, Request::put().with_if_none_match()).await?;
    if !matches!(
        first.code,
        ResponseCode::Created | ResponseCode::PreconditionFailed
    ) {
        return Err(format!(
            "If-None-Match PUT answered {}, expected 2.01 or 4.12",
            first.code
        ));
    }

    let mut expected = opposite(first.code);
    for round in 0..ROUNDS {
        let res = send(resource, Request::put().with_if_none_match()).await?;
        if res.code != expected {
            return Err(format!(
                "If-None-Match PUT #{}: expected {}, got {}",
                round + 1,
                expected,
                res.code
            ));
        }
        if res.etag.is_some() {
            return Err(format!(
                "If-None-Match PUT #{} attached an ETag",
                round + 1
            ));
        }
        expected = opposite(expected);
    }
    Ok(())
}

/// The alternation does not depend on the tag: rotations and validations
/// between If-None-Match PUTs do not reset or skip it, and If-None-Match
/// wins over a matching If-Match carried on the same request.
pub async fn check_none_match_ignores_tag_state<R: TestableResource>(
    resource: &R,
) -> Result<(), String> {
    let mut previous = send(resource, Request::put().with_if_none_match())
        .await?
        .code;

    for round in 0..ROUNDS {
        send(resource, Request::put()).await?;
        let tag = settled_tag(resource).await?;
        send(resource, Request::get().with_etag(tag)).await?;

        let res = send(
            resource,
            Request::put().with_if_none_match().with_if_match(tag),
        )
        .await?;
        let expected = opposite(previous);
        if res.code != expected {
            return Err(format!(
                "round {}: expected {}, got {} after tag activity",
                round, expected, res.code
            ));
        }
        previous = res.code;
    }
    Ok(())
}
