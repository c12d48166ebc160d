//! In-memory transport that records requests and replays scripted outcomes.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::transport::{HttpResponse, PostRequest, Transport, TransportError};

/// Copy of a request seen by [`RecordingTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub content_type: String,
    pub body: String,
}

#[derive(Debug)]
enum Outcome {
    Status(u16),
    Fail(String),
}

#[derive(Debug)]
struct State {
    script: VecDeque<Outcome>,
    fallback_status: u16,
    requests: Vec<RecordedRequest>,
}

/// Transport double that never touches the network.
///
/// Scripted outcomes are consumed in order; once the script runs out every
/// request is answered with the fallback status (200 unless overridden).
/// Clones share the same state, so a test can keep one handle while the
/// client owns another.
#[derive(Clone, Debug)]
pub struct RecordingTransport {
    state: Arc<Mutex<State>>,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::with_status(200)
    }
}

impl RecordingTransport {
    /// Transport answering every request with 200.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport answering every request with `status`.
    pub fn with_status(status: u16) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                script: VecDeque::new(),
                fallback_status: status,
                requests: Vec::new(),
            })),
        }
    }

    /// Queue a response with `status` for the next unscripted request.
    pub fn then_status(self, status: u16) -> Self {
        self.state.lock().script.push_back(Outcome::Status(status));
        self
    }

    /// Queue a transport failure for the next unscripted request.
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        self.state
            .lock()
            .script
            .push_back(Outcome::Fail(message.into()));
        self
    }

    /// All requests received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    /// Most recent request, if any.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.lock().requests.last().cloned()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.state.lock().requests.len()
    }
}

impl Transport for RecordingTransport {
    fn post(&self, request: &PostRequest<'_>) -> Result<HttpResponse, TransportError> {
        let mut state = self.state.lock();
        state.requests.push(RecordedRequest {
            url: request.url.to_owned(),
            content_type: request.content_type.to_owned(),
            body: String::from_utf8_lossy(request.body).into_owned(),
        });
        match state.script.pop_front() {
            Some(Outcome::Status(status)) => Ok(HttpResponse::with_status(status)),
            Some(Outcome::Fail(message)) => Err(TransportError::Request(message)),
            None => Ok(HttpResponse::with_status(state.fallback_status)),
        }
    }
}
