//! HTTP/HTTPS client for the ThingsBoard device API.
//!
//! Devices authenticate with an access token embedded in the URL and POST
//! small JSON objects to `/api/v1/<token>/telemetry` or
//! `/api/v1/<token>/attributes`. Payloads are bounded by a configurable
//! field count and byte budget so the client behaves predictably on
//! constrained hosts.
//!
//! ```no_run
//! use thingsboard_http::{ClientConfigBuilder, Telemetry, ThingsBoard};
//!
//! let config = ClientConfigBuilder::new()
//!     .with_host("demo.thingsboard.io")
//!     .with_access_token("A1_TEST_TOKEN")
//!     .build()?;
//! let client = ThingsBoard::connect(config)?;
//!
//! client.send_telemetry_int("temp", 25);
//! client.send_telemetry(&[Telemetry::new("hum", 40.5_f32), Telemetry::new("door", "open")]);
//! # Ok::<(), thingsboard_http::ConfigError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod payload;
pub mod telemetry;
pub mod transport;

#[cfg(any(test, feature = "test-util"))]
pub mod test_utils;

pub use client::ThingsBoard;
pub use config::{
    ClientConfig, ClientConfigBuilder, ConfigError, DEFAULT_MAX_FIELDS, DEFAULT_PAYLOAD_SIZE,
    Endpoint, MAX_CAPACITY, Scheme,
};
pub use error::SendError;
pub use logger::{ClientLogger, DefaultLogger, NullLogger};
pub use payload::{JsonDocument, PayloadError};
pub use telemetry::{Attribute, Telemetry, Value, ValueKind};
pub use transport::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, HttpResponse, PostRequest, TlsOptions,
    Transport, TransportError, TransportOptions, UreqTransport,
};
