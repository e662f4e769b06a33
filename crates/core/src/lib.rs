//! plugtest-core: the conditional-request plugtest resource.
//!
//! A single resource whose entity tag moves deterministically in response
//! to the requests it sees, for exercising client-side ETag caching,
//! `If-Match` and `If-None-Match` handling.
//!
//! # Public API
//!
//! - [`PlugtestResource`] -- the evaluator, with one handler per method
//! - [`ResourceState`] -- the tag store it owns
//! - [`rotate`] -- the tag generator transition
//! - [`Request`], [`Response`], [`ETag`] -- the descriptors an engine fills
//!   in and reads back
//! - [`PlugtestError`] -- decode errors at the engine boundary

pub mod error;
pub mod etag;
pub mod generator;
pub mod message;
pub mod resource;
pub mod state;

// ── Convenience re-exports ───────────────────────────────────────────

pub use error::PlugtestError;
pub use etag::{ETag, MAX_ETAG_LEN};
pub use generator::rotate;
pub use message::{ContentFormat, Method, MessageType, Request, Response, ResponseCode};
pub use resource::{
    PlugtestResource, CONTENT_MAX_AGE, CREATED_LOCATION, MAX_PLUGTEST_PAYLOAD,
    RESOURCE_ATTRIBUTES, RESOURCE_PATH,
};
pub use state::ResourceState;
