//! Rewind: HTTP client mocking with record-once, replay-forever fixtures.
//!
//! Everything that sends a request implements the [`HttpClient`] trait.
//! [`MockHttpClient`] replays an ordered queue of expected exchanges and
//! fails loudly on any deviation; [`CapturingHttpClient`] wraps a live
//! client, records the traffic, and emits a Rust source fixture that
//! rebuilds an identical mock for later runs. Canned request bodies are
//! compared through the wildcard [`pattern`] language (`%d%`, `%a%`, raw
//! `~regex~`, ...).
//!
//! ```
//! use rewind_http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, MockHttpClient};
//!
//! let mut client = MockHttpClient::new();
//! client.add(
//!     HttpRequest::builder(HttpMethod::Get, "http://localhost/a").build(),
//!     HttpResponse::builder(200).body("ok").build()?,
//! );
//!
//! let response = client.send_request(
//!     &HttpRequest::builder(HttpMethod::Get, "http://localhost/a").build(),
//! )?;
//! assert_eq!(response.body_text(), "ok");
//! assert!(client.all_expectations_satisfied());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod capture;
pub mod client;
pub mod fixture;
pub mod logging;
pub mod message;
pub mod mock;
pub mod pattern;

pub use capture::CapturingHttpClient;
pub use client::{HttpClient, HttpClientError};
pub use fixture::FixtureError;
pub use logging::{JsonFormatter, LoggingFormatter, LoggingHttpClient, PlainFormatter};
pub use message::{
    ConstructionError, Headers, HttpMethod, HttpRequest, HttpResponse, HttpVersion,
};
pub use mock::{MismatchError, MockHttpClient};
pub use pattern::PatternError;
