//! The transport capability every client implements.

use crate::message::{HttpMethod, HttpRequest, HttpResponse};
use crate::mock::MismatchError;
use crate::pattern::PatternError;

/// Abstract request-sending capability.
///
/// Implemented by the mock/capture engine in this crate and by whatever
/// live adapter the caller brings. `send_request` is blocking; both core
/// implementations mutate owned state, hence `&mut self`.
pub trait HttpClient {
    fn send_request(&mut self, request: &HttpRequest) -> Result<HttpResponse, HttpClientError>;
}

/// Failure surfaced by an [`HttpClient`] implementation.
///
/// None of these are retried or recovered internally; the mock variants in
/// particular exist to fail loudly and precisely when a test expectation is
/// violated.
#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    /// The queued expectation differs from the incoming request.
    #[error(transparent)]
    Mismatch(#[from] MismatchError),

    /// A request arrived after the expectation queue was drained.
    #[error("no queued expectation remains, but {method} {url} arrived")]
    NoMoreExpectations { method: HttpMethod, url: String },

    /// A canned body pattern failed to compile.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// Failure reported by a live transport adapter, passed through
    /// unmodified.
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}
