//! Test helpers shared by unit tests, integration tests, and downstream
//! crates enabling the `test-util` feature.
//!
//! - [`RecordingTransport`] captures requests and replays scripted outcomes
//!   without touching the network.
//! - [`CollectingLogger`] keeps every diagnostic the client emits.
//! - [`MockServer`] is a one-request-per-connection HTTP server on an
//!   ephemeral port for end-to-end checks through a real transport.

mod collecting_logger;
mod mock_server;
mod recording_transport;

pub use collecting_logger::CollectingLogger;
pub use mock_server::{CapturedRequest, MockServer};
pub use recording_transport::{RecordedRequest, RecordingTransport};
