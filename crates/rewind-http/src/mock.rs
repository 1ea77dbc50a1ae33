//! Deterministic stand-in client enforcing exact, ordered request
//! expectations.
//!
//! Expectations are `(request, response)` pairs registered with [`add`] and
//! consumed strictly in FIFO order: each `send_request` call must match the
//! head pair or fail without touching the queue. Tests are expected to
//! assert [`all_expectations_satisfied`] at teardown to catch calls that
//! never happened.
//!
//! [`add`]: MockHttpClient::add
//! [`all_expectations_satisfied`]: MockHttpClient::all_expectations_satisfied

use crate::client::{HttpClient, HttpClientError};
use crate::message::{Headers, HttpMethod, HttpRequest, HttpResponse};
use crate::pattern;
use std::collections::VecDeque;

// URL values above this length are cut down in error payloads so failure
// messages stay readable.
const URL_DISPLAY_LIMIT: usize = 250;
const URL_KEPT_PREFIX: usize = 200;

/// The head expectation differs from the incoming request.
///
/// One variant per matching axis, each carrying the expected and actual
/// values for diagnostics. A mismatch never dequeues the expectation.
#[derive(Debug, thiserror::Error)]
pub enum MismatchError {
    #[error("request URL mismatch: expected {expected:?}, got {actual:?}")]
    Url { expected: String, actual: String },

    #[error("request method mismatch: expected {expected}, got {actual}")]
    Method {
        expected: HttpMethod,
        actual: HttpMethod,
    },

    #[error("request headers mismatch: expected {expected:?}, got {actual:?}")]
    Headers { expected: Headers, actual: Headers },

    #[error("request body {actual:?} does not match pattern {pattern:?}")]
    Body { pattern: String, actual: String },
}

/// Replays a queue of canned exchanges in registration order.
#[derive(Debug, Default)]
pub struct MockHttpClient {
    expectations: VecDeque<(HttpRequest, HttpResponse)>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        MockHttpClient {
            expectations: VecDeque::new(),
        }
    }

    /// Register the next expected request and the response to replay for it.
    pub fn add(&mut self, request: HttpRequest, response: HttpResponse) {
        self.expectations.push_back((request, response));
    }

    /// True iff every registered expectation has been consumed. Assert this
    /// at teardown.
    pub fn all_expectations_satisfied(&self) -> bool {
        self.expectations.is_empty()
    }

    /// Number of expectations not yet consumed.
    pub fn remaining(&self) -> usize {
        self.expectations.len()
    }

    /// Compare an incoming request against the head expectation on the four
    /// matching axes: URL, method, headers, body pattern.
    fn match_request(
        expected: &HttpRequest,
        actual: &HttpRequest,
    ) -> Result<(), HttpClientError> {
        if expected.url() != actual.url() {
            return Err(MismatchError::Url {
                expected: ellipsize(expected.url()),
                actual: ellipsize(actual.url()),
            }
            .into());
        }
        if expected.method() != actual.method() {
            return Err(MismatchError::Method {
                expected: expected.method(),
                actual: actual.method(),
            }
            .into());
        }
        if expected.headers() != actual.headers() {
            return Err(MismatchError::Headers {
                expected: expected.headers().clone(),
                actual: actual.headers().clone(),
            }
            .into());
        }
        let pattern = expected.body_text();
        let body = actual.body_text();
        if !pattern::is_matching(&pattern, &body, false)? {
            return Err(MismatchError::Body {
                pattern: pattern.into_owned(),
                actual: body.into_owned(),
            }
            .into());
        }
        Ok(())
    }
}

impl HttpClient for MockHttpClient {
    fn send_request(&mut self, request: &HttpRequest) -> Result<HttpResponse, HttpClientError> {
        let Some((expected, _)) = self.expectations.front() else {
            return Err(HttpClientError::NoMoreExpectations {
                method: request.method(),
                url: ellipsize(request.url()),
            });
        };
        Self::match_request(expected, request)?;

        // Only reached on a full match; the pair leaves the queue together.
        let (_, response) = self
            .expectations
            .pop_front()
            .expect("head expectation checked above");
        tracing::debug!(
            method = %request.method(),
            url = request.url(),
            remaining = self.expectations.len(),
            "replayed canned response"
        );
        Ok(response)
    }
}

/// Cut long values down to a readable prefix plus an ellipsis marker.
pub(crate) fn ellipsize(value: &str) -> String {
    if value.chars().count() <= URL_DISPLAY_LIMIT {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(URL_KEPT_PREFIX).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::HttpMethod;

    fn get_request(url: &str) -> HttpRequest {
        HttpRequest::builder(HttpMethod::Get, url).build()
    }

    fn ok_response(body: &str) -> HttpResponse {
        HttpResponse::builder(200).body(body.to_string()).build().unwrap()
    }

    #[test]
    fn test_matching_request_returns_canned_response_and_dequeues() {
        let mut client = MockHttpClient::new();
        client.add(get_request("http://localhost/a"), ok_response("ok"));

        assert_eq!(client.remaining(), 1);
        let response = client.send_request(&get_request("http://localhost/a")).unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.body_text(), "ok");
        assert!(client.all_expectations_satisfied());
    }

    #[test]
    fn test_exhausted_queue_raises_no_more_expectations() {
        let mut client = MockHttpClient::new();
        client.add(get_request("http://localhost/a"), ok_response("ok"));
        client.send_request(&get_request("http://localhost/a")).unwrap();

        let err = client
            .send_request(&get_request("http://localhost/a"))
            .unwrap_err();
        assert!(matches!(err, HttpClientError::NoMoreExpectations { .. }));
    }

    #[test]
    fn test_url_mismatch_leaves_queue_unchanged() {
        let mut client = MockHttpClient::new();
        client.add(get_request("http://localhost/a"), ok_response("ok"));

        let err = client
            .send_request(&get_request("http://localhost/b"))
            .unwrap_err();
        assert!(matches!(
            err,
            HttpClientError::Mismatch(MismatchError::Url { .. })
        ));
        assert_eq!(client.remaining(), 1);

        // The queue is intact, so the right request still succeeds.
        client.send_request(&get_request("http://localhost/a")).unwrap();
    }

    #[test]
    fn test_method_mismatch() {
        let mut client = MockHttpClient::new();
        client.add(get_request("http://localhost/a"), ok_response("ok"));

        let actual = HttpRequest::builder(HttpMethod::Post, "http://localhost/a").build();
        let err = client.send_request(&actual).unwrap_err();
        assert!(matches!(
            err,
            HttpClientError::Mismatch(MismatchError::Method {
                expected: HttpMethod::Get,
                actual: HttpMethod::Post,
            })
        ));
        assert_eq!(client.remaining(), 1);
    }

    #[test]
    fn test_headers_mismatch_is_structural() {
        let mut client = MockHttpClient::new();
        let expected = HttpRequest::builder(HttpMethod::Get, "http://localhost/a")
            .header("Host", "localhost")
            .build();
        client.add(expected, ok_response("ok"));

        let actual = HttpRequest::builder(HttpMethod::Get, "http://localhost/a")
            .header("Host", "example.com")
            .build();
        let err = client.send_request(&actual).unwrap_err();
        assert!(matches!(
            err,
            HttpClientError::Mismatch(MismatchError::Headers { .. })
        ));
        assert_eq!(client.remaining(), 1);
    }

    #[test]
    fn test_body_pattern_match() {
        let mut client = MockHttpClient::new();
        let expected = HttpRequest::builder(HttpMethod::Post, "http://localhost/a")
            .body("%d%")
            .build();
        client.add(expected.clone(), ok_response("ok"));

        let actual = HttpRequest::builder(HttpMethod::Post, "http://localhost/a")
            .body("42")
            .build();
        client.send_request(&actual).unwrap();
        assert!(client.all_expectations_satisfied());
    }

    #[test]
    fn test_body_pattern_mismatch() {
        let mut client = MockHttpClient::new();
        let expected = HttpRequest::builder(HttpMethod::Post, "http://localhost/a")
            .body("%d%")
            .build();
        client.add(expected, ok_response("ok"));

        let actual = HttpRequest::builder(HttpMethod::Post, "http://localhost/a")
            .body("4x")
            .build();
        let err = client.send_request(&actual).unwrap_err();
        assert!(matches!(
            err,
            HttpClientError::Mismatch(MismatchError::Body { .. })
        ));
        assert_eq!(client.remaining(), 1);
    }

    #[test]
    fn test_malformed_body_pattern_propagates() {
        let mut client = MockHttpClient::new();
        let expected = HttpRequest::builder(HttpMethod::Post, "http://localhost/a")
            .body("~(unclosed~")
            .build();
        client.add(expected, ok_response("ok"));

        let actual = HttpRequest::builder(HttpMethod::Post, "http://localhost/a")
            .body("anything")
            .build();
        let err = client.send_request(&actual).unwrap_err();
        assert!(matches!(err, HttpClientError::Pattern(_)));
    }

    #[test]
    fn test_draining_n_pairs_satisfies_expectations() {
        let mut client = MockHttpClient::new();
        for i in 0..3 {
            client.add(
                get_request(&format!("http://localhost/{i}")),
                ok_response(&format!("body {i}")),
            );
        }
        assert!(!client.all_expectations_satisfied());

        for i in 0..3 {
            let response = client
                .send_request(&get_request(&format!("http://localhost/{i}")))
                .unwrap();
            assert_eq!(response.body_text(), format!("body {i}"));
        }
        assert!(client.all_expectations_satisfied());
    }

    #[test]
    fn test_out_of_order_requests_are_rejected() {
        let mut client = MockHttpClient::new();
        client.add(get_request("http://localhost/1"), ok_response("one"));
        client.add(get_request("http://localhost/2"), ok_response("two"));

        let err = client
            .send_request(&get_request("http://localhost/2"))
            .unwrap_err();
        assert!(matches!(
            err,
            HttpClientError::Mismatch(MismatchError::Url { .. })
        ));
        assert_eq!(client.remaining(), 2);
    }

    #[test]
    fn test_ellipsize_truncates_long_urls() {
        let long = "x".repeat(300);
        let shown = ellipsize(&long);
        assert_eq!(shown.len(), 203);
        assert!(shown.ends_with("..."));
        assert_eq!(&shown[..200], &long[..200]);

        let short = "x".repeat(250);
        assert_eq!(ellipsize(&short), short);
    }
}
