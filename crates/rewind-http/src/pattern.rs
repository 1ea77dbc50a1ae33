//! Wildcard pattern compilation and matching for canned request bodies.
//!
//! A pattern is either a delimiter-wrapped raw regular expression
//! (`~...~` or `#...#`, optionally followed by flag letters) used verbatim,
//! or a wildcard template in which symbolic tokens such as `%d%` expand to
//! regex fragments and every other character matches literally. Fixture
//! bodies recorded from live traffic often carry incidental trailing
//! newlines, so non-strict matching tolerates trailing whitespace on the
//! actual value.

use regex::{Regex, RegexBuilder};

/// Ordered wildcard token grammar. Compilation tries each token in declared
/// order before falling back to the range form and literal escaping, so the
/// order is semantic.
const GRAMMAR: &[(&str, &str)] = &[
    ("%%", "%"),
    ("%a%", r"[^\r\n]+"),
    ("%a?%", r"[^\r\n]*"),
    ("%A%", r".+"),
    ("%A?%", r".*"),
    ("%s%", r"[\t ]+"),
    ("%s?%", r"[\t ]*"),
    ("%S%", r"\S+"),
    ("%S?%", r"\S*"),
    ("%c%", r"[^\r\n]"),
    ("%d%", r"[0-9]+"),
    ("%d?%", r"[0-9]*"),
    ("%i%", r"[+-]?[0-9]+"),
    ("%f%", r"[+-]?\.?\d+\.?\d*(?:e[+-]?\d+)?"),
    ("%h%", r"[0-9a-fA-F]+"),
    ("%w%", r"[0-9a-zA-Z_]+"),
];

// Compiled-size bounds standing in for a backtracking budget; applied per
// compilation, never as global engine state.
const SIZE_LIMIT: usize = 10 * (1 << 20);
const DFA_SIZE_LIMIT: usize = 2 * (1 << 20);

/// A fixture pattern that does not compile to a valid regular expression.
///
/// Carries the offending pattern and the engine diagnostic; a malformed
/// fixture must surface to the caller, never be swallowed.
#[derive(Debug, thiserror::Error)]
#[error("body pattern {pattern:?} failed to compile: {source}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// Decide whether `actual` satisfies `pattern`.
///
/// In strict mode the pattern anchors exactly to end of input; otherwise
/// trailing whitespace on `actual` is tolerated.
pub fn is_matching(pattern: &str, actual: &str, strict: bool) -> Result<bool, PatternError> {
    Ok(compile(pattern, strict)?.is_match(actual))
}

/// Compile a pattern into its matching predicate.
pub fn compile(pattern: &str, strict: bool) -> Result<Regex, PatternError> {
    let source = match raw_regex(pattern) {
        Some(raw) => raw,
        None => expand_wildcards(pattern, strict),
    };
    RegexBuilder::new(&source)
        .size_limit(SIZE_LIMIT)
        .dfa_size_limit(DFA_SIZE_LIMIT)
        .build()
        .map_err(|source| PatternError {
            pattern: pattern.to_string(),
            source,
        })
}

/// Detect the raw-regex form: a pattern wrapped in a matching `~` or `#`
/// delimiter pair with only flag letters after the closing delimiter.
/// Returns the regex source with the flags folded into an inline group.
fn raw_regex(pattern: &str) -> Option<String> {
    let delim = pattern.chars().next()?;
    if delim != '~' && delim != '#' {
        return None;
    }
    let rest = &pattern[1..];
    let end = rest.rfind(delim)?;
    if end == 0 {
        return None;
    }
    let body = &rest[..end];
    let flags = &rest[end + 1..];
    if !flags.chars().all(|c| matches!(c, 'i' | 'm' | 's' | 'x' | 'U' | 'u')) {
        return None;
    }
    Some(if flags.is_empty() {
        body.to_string()
    } else {
        format!("(?{flags}){body}")
    })
}

/// Expand a wildcard template into an anchored regex source.
///
/// The pattern is right-trimmed first; `s` (dotall) lets `%A%` cross line
/// endings and `U` (swap greed) keeps every token shortest-match.
fn expand_wildcards(pattern: &str, strict: bool) -> String {
    let trimmed = pattern.trim_end_matches([' ', '\t', '\n', '\r']);
    let mut out = String::with_capacity(trimmed.len() + 16);
    out.push_str("(?sU)^");
    let mut rest = trimmed;
    'scan: while !rest.is_empty() {
        for (token, fragment) in GRAMMAR {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(fragment);
                rest = tail;
                continue 'scan;
            }
        }
        if let Some((class, consumed)) = range_expression(rest) {
            out.push_str(class);
            rest = &rest[consumed..];
            continue;
        }
        let Some(ch) = rest.chars().next() else { break };
        let mut buf = [0u8; 4];
        out.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
        rest = &rest[ch.len_utf8()..];
    }
    out.push_str(if strict { "$" } else { r"\s*$" });
    out
}

/// Parse the range form `%[...]quantifiers%`; the class body and any
/// trailing quantifier characters pass through unescaped.
///
/// Candidate closing brackets are tried left to right until the remainder
/// parses, the same result a lazy scan would give. An escaped `]` inside
/// the class is not expressible in this form.
fn range_expression(rest: &str) -> Option<(&str, usize)> {
    let inner = rest.strip_prefix('%')?;
    if !inner.starts_with('[') {
        return None;
    }
    let bytes = inner.as_bytes();
    let mut search = 0;
    while let Some(close) = inner[search..].find(']') {
        let class_end = search + close + 1;
        let mut idx = class_end;
        while idx < bytes.len()
            && matches!(bytes[idx], b'+' | b'*' | b'?' | b'{' | b'}' | b',' | b'0'..=b'9')
        {
            idx += 1;
        }
        if idx < bytes.len() && bytes[idx] == b'%' {
            return Some((&inner[..idx], idx + 2));
        }
        search = class_end;
    }
    None
}
