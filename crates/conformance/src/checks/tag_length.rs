//! Every tag the resource hands out is 1 to 8 bytes long.

use plugtest_core::{Request, ResponseCode, MAX_ETAG_LEN};

use super::{expect_code, expect_tag, send};
use crate::traits::TestableResource;

const ROTATIONS: usize = 200;

/// Drive many rotations through unconditional PUTs and inspect each tag.
/// A plain GET afterwards must report the last PUT's tag unchanged.
pub async fn check_tag_length_bound<R: TestableResource>(resource: &R) -> Result<(), String> {
    let mut last = None;
    for i in 0..ROTATIONS {
        let res = send(resource, Request::put()).await?;
        let context = format!("unconditional PUT #{}", i);
        expect_code(&context, &res, ResponseCode::Changed)?;
        let tag = expect_tag(&context, &res)?;
        let len = tag.as_bytes().len();
        if !(1..=MAX_ETAG_LEN).contains(&len) {
            return Err(format!("{}: tag length {} out of range", context, len));
        }
        if last == Some(tag) {
            return Err(format!("{}: rotation repeated tag {}", context, tag));
        }
        last = Some(tag);
    }

    let res = send(resource, Request::get()).await?;
    expect_code("GET after PUTs", &res, ResponseCode::Content)?;
    let tag = expect_tag("GET after PUTs", &res)?;
    if Some(tag) != last {
        return Err(format!(
            "GET after unconditional PUTs reported {} instead of the last PUT's tag",
            tag
        ));
    }
    Ok(())
}
