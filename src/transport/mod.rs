//! Request/response capability used by the client.
//!
//! The client never opens connections itself. It hands a [`PostRequest`] to
//! a [`Transport`] and inspects the returned [`HttpResponse`]. The shipped
//! implementation, [`UreqTransport`], drives HTTP and HTTPS through a
//! `ureq` agent; tests substitute a recording fake.
//!
//! Non-2xx responses are not transport errors: they come back as a normal
//! [`HttpResponse`] so the caller decides what counts as success.

mod tls;
mod ureq_transport;

use std::{io, sync::Arc};

use thiserror::Error;

pub use tls::TlsOptions;
pub use ureq_transport::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, TransportOptions, UreqTransport,
};

/// A single POST exchange handed to a [`Transport`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PostRequest<'a> {
    /// Absolute request URL.
    pub url: &'a str,
    /// Value of the `Content-Type` header.
    pub content_type: &'a str,
    /// Request body.
    pub body: &'a [u8],
}

/// Response returned by a [`Transport`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Response with the given status and nothing else.
    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }
}

/// Failures that prevented a response from being received.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, TLS, or I/O failure.
    #[error("transport failure: {0}")]
    Io(#[from] io::Error),
    /// The request could not be issued (bad URL, protocol error, ...).
    #[error("request failed: {0}")]
    Request(String),
}

/// Capability to perform one blocking POST.
///
/// Implementations are not required to be thread-safe; callers sharing one
/// transport across threads must serialise access themselves.
pub trait Transport {
    /// Send `request` and wait for the response.
    fn post(&self, request: &PostRequest<'_>) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post(&self, request: &PostRequest<'_>) -> Result<HttpResponse, TransportError> {
        (**self).post(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn post(&self, request: &PostRequest<'_>) -> Result<HttpResponse, TransportError> {
        (**self).post(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn post(&self, request: &PostRequest<'_>) -> Result<HttpResponse, TransportError> {
        (**self).post(request)
    }
}
