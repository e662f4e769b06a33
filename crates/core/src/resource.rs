//! Conditional request evaluator for the plugtest `/test` resource.
//!
//! The resource flips its own state as a side effect of being queried so
//! that a client under test is pushed through both the fresh and the stale
//! code paths on successive requests:
//!
//! - a validating GET marks the resource dirty, and the next GET rotates
//!   the tag before answering;
//! - PUT with `If-None-Match` alternates Created / Precondition Failed;
//! - PUT with a matching `If-Match` rotates the tag and marks the resource
//!   dirty again.
//!
//! POST and DELETE never touch the state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::generator;
use crate::message::{ContentFormat, Method, Request, Response, ResponseCode};
use crate::state::ResourceState;

/// Path the resource is registered under.
pub const RESOURCE_PATH: &str = "test";

/// CoRE link-format attributes advertised for the resource.
pub const RESOURCE_ATTRIBUTES: &str = "title=\"Default test resource\"";

/// Max-Age attached to Content responses, in seconds.
pub const CONTENT_MAX_AGE: u32 = 30;

/// Location returned by POST.
pub const CREATED_LOCATION: &str = "/location1/location2/location3";

/// Upper bound on the GET payload, independent of the engine's buffer.
pub const MAX_PLUGTEST_PAYLOAD: usize = 64;

/// The plugtest resource: tag store plus the randomness it rotates with.
///
/// Handlers take `&mut self`; a concurrent host must serialize calls behind
/// a single lock covering the whole value.
#[derive(Debug)]
pub struct PlugtestResource<R = StdRng> {
    state: ResourceState,
    rng: R,
}

impl PlugtestResource<StdRng> {
    /// A resource seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A resource whose tag sequence is reproducible.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for PlugtestResource<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> PlugtestResource<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            state: ResourceState::new(),
            rng,
        }
    }

    pub fn state(&self) -> &ResourceState {
        &self.state
    }

    pub fn path(&self) -> &'static str {
        RESOURCE_PATH
    }

    /// `</test>;title="Default test resource"`
    pub fn link_format(&self) -> String {
        format!("</{}>;{}", RESOURCE_PATH, RESOURCE_ATTRIBUTES)
    }

    /// Dispatch to the handler for `request.method`.
    pub fn handle(&mut self, request: &Request, response: &mut Response) {
        match request.method {
            Method::Get => self.handle_get(request, response),
            Method::Post => self.handle_post(request, response),
            Method::Put => self.handle_put(request, response),
            Method::Delete => self.handle_delete(request, response),
        }
    }

    /// Evaluate `request` into a fresh response with the given payload capacity.
    pub fn process(&mut self, request: &Request, capacity: usize) -> Response {
        let mut response = Response::with_capacity(capacity);
        self.handle(request, &mut response);
        response
    }

    pub fn handle_get(&mut self, request: &Request, response: &mut Response) {
        if self.state.pending_change() {
            generator::rotate(&mut self.state, &mut self.rng);
        }
        log_request(request);

        let supplied = request.etag_bytes();
        let tag = *self.state.tag();

        if !supplied.is_empty() && tag.matches(supplied) {
            tracing::debug!(etag = %tag, "validate");
            response.set_code(ResponseCode::Valid);
            response.set_etag(tag);

            self.state.mark_pending_change();
            tracing::debug!("server action: resource will change");
        } else {
            response.set_code(ResponseCode::Content);
            response.set_content_format(ContentFormat::TextPlain);
            response.set_etag(tag);
            response.set_max_age(CONTENT_MAX_AGE);

            let mut text = format!(
                "Type: {}\nCode: {}\nMID: {}",
                request.message_type.value(),
                request.method.code(),
                request.message_id
            );
            text.truncate(MAX_PLUGTEST_PAYLOAD);
            response.set_payload(text.as_bytes());
        }
    }

    pub fn handle_post(&mut self, request: &Request, response: &mut Response) {
        log_request(request);
        response.set_code(ResponseCode::Created);
        response.set_location_path(CREATED_LOCATION);
    }

    pub fn handle_put(&mut self, request: &Request, response: &mut Response) {
        log_request(request);

        if request.if_none_match {
            if self.state.take_none_match_outcome() {
                response.set_code(ResponseCode::Created);
                tracing::debug!("server action: If-None-Match will FAIL");
            } else {
                response.set_code(ResponseCode::PreconditionFailed);
                tracing::debug!("server action: If-None-Match will SUCCEED");
            }
            return;
        }

        let if_match = request.if_match_bytes();
        if if_match.is_empty() || self.state.tag().matches(if_match) {
            let tag = generator::rotate(&mut self.state, &mut self.rng);
            response.set_etag(tag);
            response.set_code(ResponseCode::Changed);

            if !if_match.is_empty() {
                self.state.mark_pending_change();
                tracing::debug!("server action: resource will change");
            }
        } else {
            tracing::debug!(
                supplied_len = if_match.len(),
                current_len = self.state.tag().len(),
                supplied = %hex::encode(if_match),
                current = %self.state.tag(),
                "If-Match check failed"
            );
            response.set_code(ResponseCode::PreconditionFailed);
        }
    }

    pub fn handle_delete(&mut self, request: &Request, response: &mut Response) {
        log_request(request);
        response.set_code(ResponseCode::Deleted);
    }
}

fn log_request(request: &Request) {
    tracing::debug!(
        method = %request.method,
        msg_type = %request.message_type,
        mid = request.message_id,
        "/{} request",
        RESOURCE_PATH
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::etag::ETag;
    use crate::message::MessageType;

    const CAPACITY: usize = 64;

    fn resource() -> PlugtestResource {
        PlugtestResource::seeded(0x5eed)
    }

    #[test]
    fn test_first_get_rotates_placeholder() {
        let mut res = resource();
        let out = res.process(&Request::get(), CAPACITY);
        assert_eq!(out.code, ResponseCode::Content);
        let tag = out.etag.unwrap();
        assert_ne!(tag, ETag::placeholder());
        assert_eq!(res.state().tag(), &tag);
        assert!(!res.state().pending_change());
    }

    #[test]
    fn test_content_response_shape() {
        let mut res = resource();
        let req = Request::get()
            .with_type(MessageType::NonConfirmable)
            .with_message_id(4711);
        let out = res.process(&req, CAPACITY);
        assert_eq!(out.max_age, Some(CONTENT_MAX_AGE));
        assert_eq!(out.content_format, Some(ContentFormat::TextPlain));
        assert_eq!(out.payload_str(), "Type: 1\nCode: 1\nMID: 4711");
    }

    #[test]
    fn test_content_payload_truncated_to_buffer() {
        let mut res = resource();
        let out = res.process(&Request::get().with_message_id(12345), 10);
        assert_eq!(out.payload(), b"Type: 0\nCo");
        assert_eq!(out.payload().len(), 10);
    }

    #[test]
    fn test_validating_get_echoes_tag_and_marks_pending() {
        let mut res = resource();
        let t1 = res.process(&Request::get(), CAPACITY).etag.unwrap();

        let out = res.process(&Request::get().with_etag(t1), CAPACITY);
        assert_eq!(out.code, ResponseCode::Valid);
        assert_eq!(out.etag, Some(t1));
        assert!(out.payload().is_empty());
        assert_eq!(out.max_age, None);
        assert_eq!(res.state().tag(), &t1);
        assert!(res.state().pending_change());
    }

    #[test]
    fn test_get_after_validation_rotates() {
        let mut res = resource();
        let t1 = res.process(&Request::get(), CAPACITY).etag.unwrap();
        res.process(&Request::get().with_etag(t1), CAPACITY);

        // Even presenting the old tag again: rotation happens first.
        let out = res.process(&Request::get().with_etag(t1), CAPACITY);
        assert_eq!(out.code, ResponseCode::Content);
        let t2 = out.etag.unwrap();
        assert_ne!(t1, t2);
    }

    #[test]
    fn test_mismatched_etag_is_content_without_pending() {
        let mut res = resource();
        let t1 = res.process(&Request::get(), CAPACITY).etag.unwrap();
        let mut wrong = t1.as_bytes().to_vec();
        wrong.push(0xff);

        let out = res.process(&Request::get().with_etag(&wrong), CAPACITY);
        assert_eq!(out.code, ResponseCode::Content);
        assert_eq!(out.etag, Some(t1));
        assert!(!res.state().pending_change());
    }

    #[test]
    fn test_empty_etag_is_not_a_validation() {
        let mut res = resource();
        res.process(&Request::get(), CAPACITY);
        let out = res.process(&Request::get().with_etag(b""), CAPACITY);
        assert_eq!(out.code, ResponseCode::Content);
        assert!(!res.state().pending_change());
    }

    #[test]
    fn test_post_creates_location_without_state_change() {
        let mut res = resource();
        let before = res.state().clone();
        let out = res.process(&Request::post(), CAPACITY);
        assert_eq!(out.code, ResponseCode::Created);
        assert_eq!(out.location_path.as_deref(), Some(CREATED_LOCATION));
        assert_eq!(out.etag, None);
        assert_eq!(res.state(), &before);
    }

    #[test]
    fn test_delete_without_state_change() {
        let mut res = resource();
        res.process(&Request::get(), CAPACITY);
        let before = res.state().clone();
        let out = res.process(&Request::delete(), CAPACITY);
        assert_eq!(out.code, ResponseCode::Deleted);
        assert_eq!(res.state(), &before);
    }

    #[test]
    fn test_put_if_none_match_alternates() {
        let mut res = resource();
        let put = Request::put().with_if_none_match();
        let codes: Vec<_> = (0..4).map(|_| res.process(&put, CAPACITY).code).collect();
        assert_eq!(
            codes,
            vec![
                ResponseCode::Created,
                ResponseCode::PreconditionFailed,
                ResponseCode::Created,
                ResponseCode::PreconditionFailed,
            ]
        );
    }

    #[test]
    fn test_put_if_none_match_takes_priority_over_if_match() {
        let mut res = resource();
        let tag = *res.state().tag();
        let put = Request::put().with_if_none_match().with_if_match(tag);
        let out = res.process(&put, CAPACITY);
        assert_eq!(out.code, ResponseCode::Created);
        assert_eq!(out.etag, None);
        assert_eq!(res.state().tag(), &tag);
    }

    #[test]
    fn test_unconditional_put_rotates_without_pending() {
        let mut res = resource();
        let t1 = res.process(&Request::get(), CAPACITY).etag.unwrap();
        let out = res.process(&Request::put(), CAPACITY);
        assert_eq!(out.code, ResponseCode::Changed);
        let t2 = out.etag.unwrap();
        assert_ne!(t1, t2);
        assert!(!res.state().pending_change());
    }

    #[test]
    fn test_empty_if_match_treated_as_absent() {
        let mut res = resource();
        res.process(&Request::get(), CAPACITY);
        let out = res.process(&Request::put().with_if_match(b""), CAPACITY);
        assert_eq!(out.code, ResponseCode::Changed);
        assert!(!res.state().pending_change());
    }

    #[test]
    fn test_matching_if_match_rotates_and_marks_pending() {
        let mut res = resource();
        let t1 = res.process(&Request::get(), CAPACITY).etag.unwrap();
        let out = res.process(&Request::put().with_if_match(t1), CAPACITY);
        assert_eq!(out.code, ResponseCode::Changed);
        let t2 = out.etag.unwrap();
        assert_ne!(t1, t2);
        assert_eq!(res.state().tag(), &t2);
        assert!(res.state().pending_change());
    }

    #[test]
    fn test_stale_if_match_fails_without_mutation() {
        let mut res = resource();
        let t1 = res.process(&Request::get(), CAPACITY).etag.unwrap();
        res.process(&Request::put(), CAPACITY);
        let before = res.state().clone();

        let out = res.process(&Request::put().with_if_match(t1), CAPACITY);
        assert_eq!(out.code, ResponseCode::PreconditionFailed);
        assert_eq!(out.etag, None);
        assert_eq!(res.state(), &before);
    }

    #[test]
    fn test_overlong_if_match_fails_closed() {
        let mut res = resource();
        res.process(&Request::get(), CAPACITY);
        let out = res.process(&Request::put().with_if_match([0u8; 12]), CAPACITY);
        assert_eq!(out.code, ResponseCode::PreconditionFailed);
    }

    #[test]
    fn test_link_format() {
        let res = resource();
        assert_eq!(res.link_format(), "</test>;title=\"Default test resource\"");
        assert_eq!(res.path(), "test");
    }
}
