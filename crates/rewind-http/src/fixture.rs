//! Deterministic Rust source emission for captured exchanges.
//!
//! A fixture is a standalone `.rs` file defining one
//! `pub fn <name>() -> MockHttpClient` that rebuilds the captured sequence
//! with literal `add(request, response)` calls. Rendering is a pure
//! function of the captured data, so re-recording an identical session
//! yields a byte-identical file.

use crate::message::{HttpRequest, HttpResponse};
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

static FN_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Za-z_][A-Za-z0-9_]*$").expect("static pattern"));

const HEADER_COMMENT: &str = "// Generated by rewind-http. Delete this file to re-record.\n\n";
const STATUS_EXPECT: &str = "\"captured status code is valid\"";

/// Failure while emitting a fixture file.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("{0:?} is not a valid fixture function name")]
    InvalidFunctionName(String),

    #[error("failed to write fixture file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Render captured exchanges as fixture source text.
pub fn render_fixture(
    fixture_fn: &str,
    exchanges: &[(HttpRequest, HttpResponse)],
) -> Result<String, FixtureError> {
    if !FN_NAME.is_match(fixture_fn) {
        return Err(FixtureError::InvalidFunctionName(fixture_fn.to_string()));
    }

    let mut out = String::from(HEADER_COMMENT);
    if exchanges.is_empty() {
        out.push_str("use rewind_http::MockHttpClient;\n\n");
        let _ = write!(
            out,
            "pub fn {fixture_fn}() -> MockHttpClient {{\n    MockHttpClient::new()\n}}\n"
        );
        return Ok(out);
    }

    out.push_str(
        "use rewind_http::{HttpMethod, HttpRequest, HttpResponse, HttpVersion, MockHttpClient};\n\n",
    );
    let _ = writeln!(out, "pub fn {fixture_fn}() -> MockHttpClient {{");
    out.push_str("    let mut client = MockHttpClient::new();\n");
    for (request, response) in exchanges {
        out.push_str("    client.add(\n");
        render_request(&mut out, request);
        render_response(&mut out, response);
        out.push_str("    );\n");
    }
    out.push_str("    client\n}\n");
    Ok(out)
}

/// Render and write the fixture in a single blocking write. The file is
/// regenerated wholesale; there is no partial-write recovery.
pub fn write_fixture(
    path: &Path,
    fixture_fn: &str,
    exchanges: &[(HttpRequest, HttpResponse)],
) -> Result<(), FixtureError> {
    let source = render_fixture(fixture_fn, exchanges)?;
    std::fs::write(path, source).map_err(|source| FixtureError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn render_request(out: &mut String, request: &HttpRequest) {
    let _ = writeln!(
        out,
        "        HttpRequest::builder(HttpMethod::{:?}, {})",
        request.method(),
        string_literal(request.url())
    );
    for (name, values) in request.headers().iter() {
        for value in values {
            let _ = writeln!(
                out,
                "            .header({}, {})",
                string_literal(name),
                string_literal(value)
            );
        }
    }
    if !request.body().is_empty() {
        let _ = writeln!(out, "            .body({})", body_literal(request.body()));
    }
    let _ = writeln!(
        out,
        "            .version(HttpVersion::{:?})",
        request.version()
    );
    out.push_str("            .build(),\n");
}

fn render_response(out: &mut String, response: &HttpResponse) {
    let _ = writeln!(out, "        HttpResponse::builder({})", response.status());
    for (name, values) in response.headers().iter() {
        for value in values {
            let _ = writeln!(
                out,
                "            .header({}, {})",
                string_literal(name),
                string_literal(value)
            );
        }
    }
    if !response.body().is_empty() {
        let _ = writeln!(out, "            .body({})", body_literal(response.body()));
    }
    out.push_str("            .build()\n");
    let _ = writeln!(out, "            .expect({STATUS_EXPECT}),");
}

/// Escape a string as a Rust double-quoted literal.
fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\u{{{:x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Text bodies become string literals; anything that is not valid UTF-8 is
/// preserved exactly as a byte vector literal.
fn body_literal(body: &Bytes) -> String {
    match std::str::from_utf8(body) {
        Ok(text) => string_literal(text),
        Err(_) => {
            let bytes: Vec<String> = body.iter().map(|b| format!("0x{b:02x}")).collect();
            format!("vec![{}]", bytes.join(", "))
        }
    }
}
