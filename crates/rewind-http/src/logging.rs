//! Client decorator that logs every exchange through `tracing`.
//!
//! The formatter seam keeps log layout out of the decorator: plug in
//! [`PlainFormatter`] for single-line prose or [`JsonFormatter`] for one
//! JSON object per event, or bring your own [`LoggingFormatter`].

use crate::client::{HttpClient, HttpClientError};
use crate::message::{HttpRequest, HttpResponse};
use serde_json::json;
use std::borrow::Cow;
use std::error::Error as _;
use std::time::{Duration, Instant};

/// Bodies longer than this are clipped before logging.
pub const DEFAULT_MAX_BODY_LENGTH: usize = 40_000;

/// Renders a finished (or failed) exchange as a log line.
pub trait LoggingFormatter {
    fn format_successful(
        &self,
        request: &HttpRequest,
        response: &HttpResponse,
        elapsed: Duration,
    ) -> String;

    fn format_failed(
        &self,
        request: &HttpRequest,
        error: &HttpClientError,
        elapsed: Duration,
    ) -> String;
}

/// Single-line prose formatter with JSON-encoded field values.
#[derive(Debug, Clone)]
pub struct PlainFormatter {
    max_body_length: usize,
}

impl PlainFormatter {
    pub fn new() -> Self {
        PlainFormatter {
            max_body_length: DEFAULT_MAX_BODY_LENGTH,
        }
    }

    pub fn with_max_body_length(max_body_length: usize) -> Self {
        PlainFormatter { max_body_length }
    }
}

impl Default for PlainFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingFormatter for PlainFormatter {
    fn format_successful(
        &self,
        request: &HttpRequest,
        response: &HttpResponse,
        elapsed: Duration,
    ) -> String {
        format!(
            "an HTTP request has been sent.\
             \x20Request URL: {url}\
             \x20Request method: {method}\
             \x20Request headers: {request_headers}\
             \x20Request body: {request_body}\
             \x20Response status code: {status}\
             \x20Response headers: {response_headers}\
             \x20Response body: {response_body}\
             \x20Elapsed time: {elapsed:.2} ms",
            url = json!(request.url()),
            method = json!(request.method().as_str()),
            request_headers = json!(request.headers()),
            request_body = json!(clip(request.body_text(), self.max_body_length)),
            status = response.status(),
            response_headers = json!(response.headers()),
            response_body = json!(clip(response.body_text(), self.max_body_length)),
            elapsed = elapsed.as_secs_f64() * 1000.0,
        )
    }

    fn format_failed(
        &self,
        request: &HttpRequest,
        error: &HttpClientError,
        elapsed: Duration,
    ) -> String {
        let mut line = format!(
            "an HTTP request failed.\
             \x20Request URL: {url}\
             \x20Request method: {method}\
             \x20Request headers: {request_headers}\
             \x20Request body: {request_body}\
             \x20Error: {error}",
            url = json!(request.url()),
            method = json!(request.method().as_str()),
            request_headers = json!(request.headers()),
            request_body = json!(clip(request.body_text(), self.max_body_length)),
            error = json!(error.to_string()),
        );
        if let Some(source) = error.source() {
            line.push_str(&format!(" Caused by: {}", json!(source.to_string())));
        }
        line.push_str(&format!(
            " Elapsed time: {:.2} ms",
            elapsed.as_secs_f64() * 1000.0
        ));
        line
    }
}

/// One JSON object per exchange, for structured log pipelines.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    max_body_length: usize,
}

impl JsonFormatter {
    pub fn new() -> Self {
        JsonFormatter {
            max_body_length: DEFAULT_MAX_BODY_LENGTH,
        }
    }

    pub fn with_max_body_length(max_body_length: usize) -> Self {
        JsonFormatter { max_body_length }
    }

    fn request_object(&self, request: &HttpRequest) -> serde_json::Value {
        json!({
            "url": request.url(),
            "method": request.method().as_str(),
            "headers": request.headers(),
            "body": clip(request.body_text(), self.max_body_length),
        })
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingFormatter for JsonFormatter {
    fn format_successful(
        &self,
        request: &HttpRequest,
        response: &HttpResponse,
        elapsed: Duration,
    ) -> String {
        json!({
            "description": "an HTTP request has been sent.",
            "request": self.request_object(request),
            "response": {
                "statusCode": response.status(),
                "headers": response.headers(),
                "body": clip(response.body_text(), self.max_body_length),
            },
            "elapsedTime": format!("{:.2}", elapsed.as_secs_f64() * 1000.0),
        })
        .to_string()
    }

    fn format_failed(
        &self,
        request: &HttpRequest,
        error: &HttpClientError,
        elapsed: Duration,
    ) -> String {
        json!({
            "description": "an HTTP request failed.",
            "request": self.request_object(request),
            "error": {
                "message": error.to_string(),
                "source": error.source().map(|s| s.to_string()),
            },
            "elapsedTime": format!("{:.2}", elapsed.as_secs_f64() * 1000.0),
        })
        .to_string()
    }
}

fn clip(body: Cow<'_, str>, max_chars: usize) -> String {
    if body.chars().count() <= max_chars {
        body.into_owned()
    } else {
        body.chars().take(max_chars).collect()
    }
}

/// Decorator that times the inner call and emits one `tracing` event per
/// exchange. The inner result is returned untouched either way.
pub struct LoggingHttpClient<C: HttpClient, F: LoggingFormatter> {
    inner: C,
    formatter: F,
}

impl<C: HttpClient, F: LoggingFormatter> LoggingHttpClient<C, F> {
    pub fn new(inner: C, formatter: F) -> Self {
        LoggingHttpClient { inner, formatter }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: HttpClient, F: LoggingFormatter> HttpClient for LoggingHttpClient<C, F> {
    fn send_request(&mut self, request: &HttpRequest) -> Result<HttpResponse, HttpClientError> {
        let started = Instant::now();
        match self.inner.send_request(request) {
            Ok(response) => {
                tracing::info!(
                    "{}",
                    self.formatter
                        .format_successful(request, &response, started.elapsed())
                );
                Ok(response)
            }
            Err(error) => {
                tracing::warn!(
                    "{}",
                    self.formatter.format_failed(request, &error, started.elapsed())
                );
                Err(error)
            }
        }
    }
}
