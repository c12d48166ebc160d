//! Endpoint URL construction.
//!
//! URLs follow the device API layout
//! `<scheme>://<host>:<port>/api/v1/<token>/<telemetry|attributes>`. The
//! token is percent-encoded as a single path segment so it can never add
//! segments or a query string; tokens made of unreserved characters are
//! left untouched.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::config::{Endpoint, Scheme};

/// Characters to percent-encode inside one URL path segment.
///
/// Encodes control characters, space, and everything with special meaning
/// in a path or that would end it, while leaving RFC 3986 unreserved
/// characters (alphanumeric, `-`, `_`, `.`, `~`) as-is.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Placeholder substituted for the token in log output.
const REDACTED: &str = "***";

/// Full endpoint URL for `token`.
pub(crate) fn endpoint_url(
    scheme: Scheme,
    host: &str,
    port: u16,
    token: &str,
    endpoint: Endpoint,
) -> String {
    let token = utf8_percent_encode(token, PATH_SEGMENT_ENCODE_SET).to_string();
    format_url(scheme, host, port, &token, endpoint)
}

/// Endpoint URL with the token masked, for diagnostics.
pub(crate) fn redacted_url(scheme: Scheme, host: &str, port: u16, endpoint: Endpoint) -> String {
    format_url(scheme, host, port, REDACTED, endpoint)
}

fn format_url(scheme: Scheme, host: &str, port: u16, token: &str, endpoint: Endpoint) -> String {
    format!(
        "{}://{}:{}/api/v1/{}/{}",
        scheme.as_str(),
        host,
        port,
        token,
        endpoint.path_segment()
    )
}
