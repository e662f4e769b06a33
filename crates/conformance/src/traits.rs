use async_trait::async_trait;
use plugtest_core::{Request, Response};

/// Result type for conformance exchanges.
pub type ConformanceResult<T> = Result<T, ConformanceError>;

/// Failures to carry a request to the resource under test.
///
/// A `4.12` answer is not one of these; it comes back as an ordinary
/// [`Response`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConformanceError {
    /// The request never reached the resource or the reply never came back.
    #[error("transport error: {0}")]
    Transport(String),

    /// A reply arrived but could not be mapped back onto a [`Response`].
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Anything that can carry a plugtest request to a resource and bring the
/// response back: an in-process instance, or a remote one behind an engine.
#[async_trait]
pub trait TestableResource: Send + Sync {
    /// Deliver one request and return the resource's response.
    async fn exchange(&self, request: &Request) -> ConformanceResult<Response>;
}
