//! Record-once, replay-forever client wrapper.
//!
//! In record mode every successful exchange through the wrapped client is
//! captured, and [`close`] writes the captured sequence out as a Rust
//! source fixture (see [`crate::fixture`]). When the fixture file already
//! exists, [`with_recorded`] substitutes the caller-built mock for the live
//! client, so the same test runs live once and replays forever after.
//!
//! [`close`]: CapturingHttpClient::close
//! [`with_recorded`]: CapturingHttpClient::with_recorded

use crate::client::{HttpClient, HttpClientError};
use crate::fixture::{self, FixtureError};
use crate::message::{HttpRequest, HttpResponse};
use crate::mock::MockHttpClient;
use std::path::{Path, PathBuf};

enum InnerClient<C> {
    Live(C),
    Replay(MockHttpClient),
}

/// Transparent proxy that records every exchange for fixture emission.
///
/// The wrapper must be finalized with [`close`](Self::close) exactly once;
/// `close` consumes the value, and dropping an unclosed wrapper panics as a
/// safety net against recordings that were never written out.
pub struct CapturingHttpClient<C: HttpClient> {
    inner: InnerClient<C>,
    captured: Vec<(HttpRequest, HttpResponse)>,
    path: PathBuf,
    fixture_fn: String,
    closed: bool,
}

impl<C: HttpClient> CapturingHttpClient<C> {
    /// Wrap `client` in record mode unconditionally. The fixture is written
    /// to `path` at close time as `pub fn <fixture_fn>() -> MockHttpClient`.
    pub fn new(client: C, path: impl Into<PathBuf>, fixture_fn: impl Into<String>) -> Self {
        CapturingHttpClient {
            inner: InnerClient::Live(client),
            captured: Vec::new(),
            path: path.into(),
            fixture_fn: fixture_fn.into(),
            closed: false,
        }
    }

    /// Wrap `client`, replaying through `load_fixture()` instead if the
    /// fixture file at `path` already exists.
    ///
    /// `load_fixture` is the constructor of a previously emitted fixture,
    /// typically the generated function itself passed by name.
    pub fn with_recorded<F>(
        client: C,
        path: impl Into<PathBuf>,
        fixture_fn: impl Into<String>,
        load_fixture: F,
    ) -> Self
    where
        F: FnOnce() -> MockHttpClient,
    {
        let path = path.into();
        let inner = if path.is_file() {
            tracing::info!(path = %path.display(), "replaying recorded fixture");
            InnerClient::Replay(load_fixture())
        } else {
            InnerClient::Live(client)
        };
        CapturingHttpClient {
            inner,
            captured: Vec::new(),
            path,
            fixture_fn: fixture_fn.into(),
            closed: false,
        }
    }

    /// True when requests are served by a previously recorded fixture.
    pub fn is_replaying(&self) -> bool {
        matches!(self.inner, InnerClient::Replay(_))
    }

    pub fn fixture_path(&self) -> &Path {
        &self.path
    }

    /// Finalize the recording. In replay mode nothing new was captured and
    /// this is a no-op; in record mode the captured exchanges are rendered
    /// and written to the fixture file in one blocking write.
    ///
    /// Consuming `self` makes a second close unrepresentable.
    pub fn close(mut self) -> Result<(), FixtureError> {
        self.closed = true;
        match &self.inner {
            InnerClient::Replay(_) => Ok(()),
            InnerClient::Live(_) => {
                tracing::info!(
                    path = %self.path.display(),
                    exchanges = self.captured.len(),
                    "writing captured fixture"
                );
                fixture::write_fixture(&self.path, &self.fixture_fn, &self.captured)
            }
        }
    }
}

impl<C: HttpClient> HttpClient for CapturingHttpClient<C> {
    fn send_request(&mut self, request: &HttpRequest) -> Result<HttpResponse, HttpClientError> {
        match &mut self.inner {
            InnerClient::Replay(mock) => mock.send_request(request),
            InnerClient::Live(client) => {
                // Transport failures propagate untouched and are not captured.
                let response = client.send_request(request)?;
                self.captured.push((request.clone(), response.clone()));
                Ok(response)
            }
        }
    }
}

impl<C: HttpClient> Drop for CapturingHttpClient<C> {
    fn drop(&mut self) {
        if !self.closed && !std::thread::panicking() {
            panic!(
                "CapturingHttpClient for {} dropped without close(); \
                 the recording was never written",
                self.path.display()
            );
        }
    }
}
