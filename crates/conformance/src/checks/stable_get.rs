//! GETs that never validate must not change the tag.

use plugtest_core::{Request, ResponseCode};

use super::{expect_code, expect_tag, send, settled_tag, stale_variant};
use crate::traits::TestableResource;

/// Plain and mismatching GETs report the same tag over and over.
pub async fn check_stable_without_validation<R: TestableResource>(
    resource: &R,
) -> Result<(), String> {
    let tag = settled_tag(resource).await?;
    let mut overlong = tag.as_bytes().to_vec();
    overlong.resize(9, 0xee);

    let probes = [
        Request::get(),
        Request::get().with_etag(stale_variant(&tag)),
        Request::get().with_etag(&overlong),
        Request::get().with_etag(b""),
    ];

    for round in 0..5 {
        for probe in &probes {
            let res = send(resource, probe.clone()).await?;
            let context = format!("round {} GET", round);
            expect_code(&context, &res, ResponseCode::Content)?;
            let seen = expect_tag(&context, &res)?;
            if seen != tag {
                return Err(format!(
                    "{}: tag changed from {} to {} without a validation",
                    context, tag, seen
                ));
            }
        }
    }
    Ok(())
}
