//! Client configuration.
//!
//! [`ClientConfig`] carries everything a client needs besides its transport
//! and logger. It is usually produced by [`ClientConfigBuilder`], either
//! programmatically or from an INI file, which validates values before they
//! reach the client.

mod builder;
mod ini_file;

use std::{fmt, io, path::PathBuf, str::FromStr};

use thiserror::Error;

use crate::transport::TransportOptions;

pub use builder::{ClientConfigBuilder, MAX_CAPACITY};
pub use ini_file::INI_SECTION;

/// Default capacity in bytes of the rendered payload buffer, terminator
/// included.
pub const DEFAULT_PAYLOAD_SIZE: usize = 64;
/// Default maximum number of fields in one batched send.
pub const DEFAULT_MAX_FIELDS: usize = 8;
/// The only status treated as success.
pub const OK_STATUS: u16 = 200;
/// Content type of every payload.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Errors raised while building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid user supplied configuration.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
    /// Configuration file is not valid INI.
    #[error("invalid configuration file: {0}")]
    Parse(String),
    /// Configuration file does not exist.
    #[error("{} doesn't exist", .0.display())]
    NotFound(PathBuf),
    /// Underlying I/O error whilst reading configuration.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// URL scheme, and with it the kind of transport the client expects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// Well-known port for the scheme.
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Http => 80,
            Self::Https => 443,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(ConfigError::InvalidConfig(format!(
                "unknown scheme {other:?} (expected http or https)"
            ))),
        }
    }
}

/// Server-side destination of a payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Time-series measurements.
    Telemetry,
    /// Device attributes.
    Attributes,
}

impl Endpoint {
    /// Last path segment of the endpoint URL.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Telemetry => "telemetry",
            Self::Attributes => "attributes",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Configuration consumed by [`ThingsBoard`](crate::ThingsBoard).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    /// Device access token. Sends fail while it is absent or empty.
    pub access_token: Option<String>,
    /// Size of the call-local payload buffer, terminator included.
    pub payload_size: usize,
    /// Maximum number of records in one batched send.
    pub max_fields: usize,
    /// Settings for the `ureq` transport built by
    /// [`ThingsBoard::connect`](crate::ThingsBoard::connect).
    pub transport: TransportOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scheme: Scheme::default(),
            host: String::new(),
            port: Scheme::default().default_port(),
            access_token: None,
            payload_size: DEFAULT_PAYLOAD_SIZE,
            max_fields: DEFAULT_MAX_FIELDS,
            transport: TransportOptions::default(),
        }
    }
}

impl ClientConfig {
    /// Access token, treating an empty string as absent.
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }
}
