//! `ureq`-backed transport.
//!
//! One agent is built per transport and reused for every request, so
//! keep-alive connections are pooled by `ureq`. Redirects are not followed:
//! the device API answers directly, and a redirect is reported back to the
//! caller as its 3xx status.

use std::{io, time::Duration};

use log::warn;
use ureq::{Agent, AgentBuilder};

use super::{HttpResponse, PostRequest, TlsOptions, Transport, TransportError};

/// Default connection timeout applied when establishing connections.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default overall timeout applied to each request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings used to build a [`UreqTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportOptions {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub tls: TlsOptions,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            tls: TlsOptions::default(),
        }
    }
}

/// Blocking HTTP/HTTPS transport built on a `ureq` agent.
#[derive(Clone, Debug)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// Build a transport from `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS connector cannot be initialised.
    pub fn new(options: &TransportOptions) -> io::Result<Self> {
        let agent = AgentBuilder::new()
            .timeout_connect(options.connect_timeout)
            .timeout(options.request_timeout)
            .redirects(0)
            .tls_connector(options.tls.connector()?)
            .build();
        Ok(Self { agent })
    }

    /// Wrap an agent configured elsewhere.
    pub fn from_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn post(&self, request: &PostRequest<'_>) -> Result<HttpResponse, TransportError> {
        let result = self
            .agent
            .post(request.url)
            .set("Content-Type", request.content_type)
            .send_bytes(request.body);

        match result {
            Ok(response) => Ok(into_response(response)),
            Err(ureq::Error::Status(_, response)) => Ok(into_response(response)),
            Err(ureq::Error::Transport(err)) => Err(classify_transport(&err)),
        }
    }
}

fn into_response(response: ureq::Response) -> HttpResponse {
    let status = response.status();
    let status_text = response.status_text().to_string();
    let headers = response
        .headers_names()
        .into_iter()
        .filter_map(|name| {
            let value = response.header(&name)?.to_string();
            Some((name, value))
        })
        .collect();
    let body = response.into_string().unwrap_or_else(|err| {
        warn!("UreqTransport could not read response body: {err}");
        String::new()
    });
    HttpResponse {
        status,
        status_text,
        headers,
        body,
    }
}

/// Map `ureq` transport failures onto [`TransportError`].
///
/// Network-level failures become [`TransportError::Io`]; everything that
/// points at a malformed request becomes [`TransportError::Request`].
fn classify_transport(err: &ureq::Transport) -> TransportError {
    match err.kind() {
        ureq::ErrorKind::Dns | ureq::ErrorKind::ConnectionFailed | ureq::ErrorKind::Io => {
            TransportError::Io(io::Error::other(err.to_string()))
        }
        _ => TransportError::Request(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::time::Duration;

    use rstest::{fixture, rstest};

    use super::*;
    use crate::test_utils::MockServer;

    #[fixture]
    fn transport() -> UreqTransport {
        UreqTransport::new(&TransportOptions {
            connect_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(5),
            tls: TlsOptions::default(),
        })
        .expect("build transport")
    }

    fn json_request(url: &str) -> PostRequest<'_> {
        PostRequest {
            url,
            content_type: "application/json",
            body: br#"{"temp":25}"#,
        }
    }

    #[rstest]
    #[case(200)]
    #[case(201)]
    #[case(400)]
    #[case(503)]
    fn statuses_are_returned_as_responses(transport: UreqTransport, #[case] status: u16) {
        let server = MockServer::start(vec![status]);
        let url = server.url("/api/v1/TOKEN/telemetry");
        let response = transport.post(&json_request(&url)).expect("response");
        assert_eq!(response.status, status);

        let captured = server.next_request().expect("request captured");
        assert_eq!(captured.method, "POST");
        assert_eq!(captured.path, "/api/v1/TOKEN/telemetry");
        assert_eq!(captured.header("content-type"), Some("application/json"));
        assert_eq!(captured.body, r#"{"temp":25}"#);
    }

    #[rstest]
    fn redirects_are_not_followed(transport: UreqTransport) {
        let server = MockServer::start(vec![302]);
        let url = server.url("/moved");
        let response = transport.post(&json_request(&url)).expect("response");
        assert_eq!(response.status, 302);
    }

    #[rstest]
    fn refused_connection_is_an_io_error(transport: UreqTransport) {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);
        let url = format!("http://{addr}/api/v1/TOKEN/telemetry");
        let err = transport.post(&json_request(&url)).expect_err("refused");
        assert!(matches!(err, TransportError::Io(_)));
    }

    #[rstest]
    fn malformed_url_is_a_request_error(transport: UreqTransport) {
        let err = transport
            .post(&json_request("not a url"))
            .expect_err("invalid url");
        assert!(matches!(err, TransportError::Request(_)));
    }

    #[test]
    fn default_options_use_module_timeouts() {
        let options = TransportOptions::default();
        assert_eq!(options.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(options.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert!(!options.tls.insecure_skip_verify);
    }
}
