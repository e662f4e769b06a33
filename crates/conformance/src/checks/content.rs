//! Shape of the 2.05 Content answer.

use plugtest_core::{ContentFormat, MessageType, Request, ResponseCode, CONTENT_MAX_AGE};

use super::{expect_code, send};
use crate::traits::TestableResource;

/// Content carries text/plain, Max-Age 30 and a payload describing the
/// request's message type, method code and message ID.
pub async fn check_content_payload<R: TestableResource>(resource: &R) -> Result<(), String> {
    let cases = [
        (MessageType::Confirmable, 0x1234u16),
        (MessageType::NonConfirmable, 7u16),
    ];

    for (message_type, mid) in cases {
        let req = Request::get()
            .with_type(message_type)
            .with_message_id(mid);
        let res = send(resource, req).await?;
        let context = format!("{} GET mid {}", message_type, mid);
        expect_code(&context, &res, ResponseCode::Content)?;

        if res.max_age != Some(CONTENT_MAX_AGE) {
            return Err(format!(
                "{}: Max-Age {:?}, expected {}",
                context, res.max_age, CONTENT_MAX_AGE
            ));
        }
        if res.content_format != Some(ContentFormat::TextPlain) {
            return Err(format!(
                "{}: Content-Format {:?}, expected text/plain",
                context, res.content_format
            ));
        }

        let expected = format!("Type: {}\nCode: 1\nMID: {}", message_type.value(), mid);
        let payload = res.payload_str();
        // An engine with a smaller buffer truncates, down to nothing for a
        // zero-capacity buffer; whatever is kept must be a prefix.
        if !expected.starts_with(&payload) {
            return Err(format!(
                "{}: payload {:?}, expected {:?}",
                context, payload, expected
            ));
        }
    }
    Ok(())
}
