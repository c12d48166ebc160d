//! The telemetry and attribute client.
//!
//! [`ThingsBoard`] serves both HTTP and HTTPS: the scheme is configuration
//! and the transport is a type parameter. Every send follows the same
//! path:
//!
//! 1. Build [`Telemetry`] records from the typed arguments.
//! 2. Serialise them into a [`JsonDocument`] bounded by the field capacity.
//! 3. Render the document into a call-local buffer of at most
//!    `payload_size` bytes, terminator included.
//! 4. POST the text to `/api/v1/<token>/<telemetry|attributes>`.
//!
//! Only a 200 response counts as success. There are no retries, and a batch
//! is either sent whole or not at all.
//!
//! # Failure reporting
//!
//! `send_*` methods return `bool` and hand the failure message to the
//! configured [`ClientLogger`]. Each has a `try_send_*` twin returning the
//! [`SendError`] instead; those do not log.
//!
//! # Concurrency
//!
//! Sends take `&self` and keep their buffers on the call stack. The client
//! adds no locking around the transport: callers sharing one transport
//! across threads must serialise access, or give each thread its own
//! client.

mod url;


use std::{fmt, sync::Arc};

use log::{Level, debug, log_enabled, trace};

use crate::{
    config::{ClientConfig, ConfigError, Endpoint, JSON_CONTENT_TYPE, OK_STATUS, Scheme},
    error::SendError,
    logger::{ClientLogger, DEFAULT_LOGGER},
    payload::{JsonDocument, PayloadError},
    telemetry::{Attribute, Telemetry, Value},
    transport::{HttpResponse, PostRequest, Transport, UreqTransport},
};

use self::url::{endpoint_url, redacted_url};

macro_rules! keyval_sender {
    ($(#[$meta:meta])* $name:ident, $try_name:ident, $ty:ty, $endpoint:expr) => {
        $(#[$meta])*
        pub fn $name(&self, key: &str, value: $ty) -> bool {
            self.report(self.$try_name(key, value))
        }

        #[doc = concat!(
            "Like [`", stringify!($name), "`](Self::", stringify!($name),
            ") but returns the failure instead of logging it."
        )]
        pub fn $try_name(&self, key: &str, value: $ty) -> Result<(), SendError> {
            self.send_keyval(key, Value::from(value), $endpoint)
        }
    };
}

/// Client posting telemetry and attributes over HTTP or HTTPS.
pub struct ThingsBoard<T> {
    config: ClientConfig,
    transport: Option<T>,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl<T> ThingsBoard<T> {
    /// Unconfigured client for `scheme`. Call [`begin`](Self::begin) or
    /// [`begin_deferred`](Self::begin_deferred) before sending.
    pub fn new(scheme: Scheme) -> Self {
        let config = ClientConfig {
            scheme,
            port: scheme.default_port(),
            ..ClientConfig::default()
        };
        Self::with_config(config, None)
    }

    /// Unconfigured plain HTTP client.
    pub fn http() -> Self {
        Self::new(Scheme::Http)
    }

    /// Unconfigured HTTPS client.
    pub fn https() -> Self {
        Self::new(Scheme::Https)
    }

    /// Client from a full configuration, optionally with its transport.
    pub fn with_config(config: ClientConfig, transport: Option<T>) -> Self {
        Self {
            config,
            transport,
            logger: None,
        }
    }

    /// Configure connection parameters and attach `transport`.
    ///
    /// Passing `None` as `logger` selects [`DefaultLogger`](crate::DefaultLogger).
    /// Capacities configured earlier are kept.
    pub fn begin(
        &mut self,
        transport: T,
        access_token: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        logger: Option<Arc<dyn ClientLogger>>,
    ) {
        self.begin_deferred(access_token, host, port, logger);
        self.transport = Some(transport);
    }

    /// Configure connection parameters without a transport.
    ///
    /// Used when the transport (typically a TLS session) is established
    /// later; attach it with [`set_transport`](Self::set_transport). Sends
    /// fail until then.
    pub fn begin_deferred(
        &mut self,
        access_token: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        logger: Option<Arc<dyn ClientLogger>>,
    ) {
        self.config.access_token = Some(access_token.into());
        self.config.host = host.into();
        self.config.port = port;
        self.logger = logger;
        self.transport = None;
    }

    /// Attach or replace the transport.
    pub fn set_transport(&mut self, transport: T) {
        self.transport = Some(transport);
    }

    /// Replace the logger; `None` selects the default logger.
    pub fn set_logger(&mut self, logger: Option<Arc<dyn ClientLogger>>) {
        self.logger = logger;
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn scheme(&self) -> Scheme {
        self.config.scheme
    }

    pub fn has_transport(&self) -> bool {
        self.transport.is_some()
    }

    fn logger(&self) -> &dyn ClientLogger {
        self.logger.as_deref().unwrap_or(&DEFAULT_LOGGER)
    }
}

impl ThingsBoard<UreqTransport> {
    /// Client with a `ureq` transport built from `config.transport`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the TLS connector cannot be initialised.
    pub fn connect(config: ClientConfig) -> Result<Self, ConfigError> {
        let transport = UreqTransport::new(&config.transport)?;
        Ok(Self::with_config(config, Some(transport)))
    }
}

impl<T: Transport> ThingsBoard<T> {
    //------------------------------------------------------------------
    // Telemetry API

    keyval_sender!(
        /// Send a signed integer telemetry value. Returns `true` on success.
        send_telemetry_int,
        try_send_telemetry_int,
        i32,
        Endpoint::Telemetry
    );
    keyval_sender!(
        /// Send an unsigned integer telemetry value. Returns `true` on success.
        send_telemetry_uint,
        try_send_telemetry_uint,
        u32,
        Endpoint::Telemetry
    );
    keyval_sender!(
        /// Send a boolean telemetry value. Returns `true` on success.
        send_telemetry_bool,
        try_send_telemetry_bool,
        bool,
        Endpoint::Telemetry
    );
    keyval_sender!(
        /// Send a floating point telemetry value. Returns `true` on success.
        send_telemetry_float,
        try_send_telemetry_float,
        f32,
        Endpoint::Telemetry
    );
    keyval_sender!(
        /// Send a string telemetry value. Returns `true` on success.
        send_telemetry_string,
        try_send_telemetry_string,
        &str,
        Endpoint::Telemetry
    );

    /// Send several telemetry records as one JSON object.
    pub fn send_telemetry(&self, records: &[Telemetry<'_>]) -> bool {
        self.report(self.try_send_telemetry(records))
    }

    pub fn try_send_telemetry(&self, records: &[Telemetry<'_>]) -> Result<(), SendError> {
        self.send_records(records, Endpoint::Telemetry)
    }

    /// Send caller-rendered JSON to the telemetry endpoint.
    pub fn send_telemetry_json(&self, json: &str) -> bool {
        self.report(self.try_send_telemetry_json(json))
    }

    pub fn try_send_telemetry_json(&self, json: &str) -> Result<(), SendError> {
        self.post_json(json.as_bytes(), Endpoint::Telemetry)
    }

    //------------------------------------------------------------------
    // Attribute API

    keyval_sender!(
        /// Send a signed integer attribute. Returns `true` on success.
        send_attribute_int,
        try_send_attribute_int,
        i32,
        Endpoint::Attributes
    );
    keyval_sender!(
        /// Send an unsigned integer attribute. Returns `true` on success.
        send_attribute_uint,
        try_send_attribute_uint,
        u32,
        Endpoint::Attributes
    );
    keyval_sender!(
        /// Send a boolean attribute. Returns `true` on success.
        send_attribute_bool,
        try_send_attribute_bool,
        bool,
        Endpoint::Attributes
    );
    keyval_sender!(
        /// Send a floating point attribute. Returns `true` on success.
        send_attribute_float,
        try_send_attribute_float,
        f32,
        Endpoint::Attributes
    );
    keyval_sender!(
        /// Send a string attribute. Returns `true` on success.
        send_attribute_string,
        try_send_attribute_string,
        &str,
        Endpoint::Attributes
    );

    /// Send several attributes as one JSON object.
    pub fn send_attributes(&self, attributes: &[Attribute<'_>]) -> bool {
        self.report(self.try_send_attributes(attributes))
    }

    pub fn try_send_attributes(&self, attributes: &[Attribute<'_>]) -> Result<(), SendError> {
        self.send_records(attributes, Endpoint::Attributes)
    }

    /// Send caller-rendered JSON to the attributes endpoint.
    pub fn send_attributes_json(&self, json: &str) -> bool {
        self.report(self.try_send_attributes_json(json))
    }

    pub fn try_send_attributes_json(&self, json: &str) -> Result<(), SendError> {
        self.post_json(json.as_bytes(), Endpoint::Attributes)
    }

    //------------------------------------------------------------------

    fn send_keyval<'a>(
        &self,
        key: &'a str,
        value: Value<'a>,
        endpoint: Endpoint,
    ) -> Result<(), SendError> {
        let record = Telemetry::new(key, value);
        let mut doc = JsonDocument::with_capacity(1);
        record.serialize_keyval(&mut doc)?;
        self.dispatch(&doc, endpoint)
    }

    fn send_records(&self, records: &[Telemetry<'_>], endpoint: Endpoint) -> Result<(), SendError> {
        let capacity = self.config.max_fields;
        if records.len() > capacity {
            return Err(SendError::TooManyFields {
                count: records.len(),
                capacity,
            });
        }
        let mut doc = JsonDocument::with_capacity(capacity);
        for record in records {
            record.serialize_keyval(&mut doc)?;
        }
        if doc.is_empty() {
            return Err(SendError::EmptyPayload);
        }
        self.dispatch(&doc, endpoint)
    }

    fn dispatch(&self, doc: &JsonDocument<'_>, endpoint: Endpoint) -> Result<(), SendError> {
        // Only the rendered text and its terminator are allocated; the
        // configured size is the upper bound.
        let required = doc.measure()? + 1;
        if required > self.config.payload_size {
            return Err(PayloadError::BufferTooSmall {
                required,
                capacity: self.config.payload_size,
            }
            .into());
        }
        let mut payload = vec![0u8; required];
        let len = doc.render_into(&mut payload)?;
        self.post_json(&payload[..len], endpoint)
    }

    fn post_json(&self, json: &[u8], endpoint: Endpoint) -> Result<(), SendError> {
        if json.is_empty() {
            return Err(SendError::EmptyPayload);
        }
        let token = self.config.token().ok_or(SendError::MissingToken)?;
        let transport = self
            .transport
            .as_ref()
            .ok_or(SendError::MissingTransport(self.config.scheme))?;

        let ClientConfig {
            scheme, host, port, ..
        } = &self.config;
        let url = endpoint_url(*scheme, host, *port, token, endpoint);
        debug!(
            "POST {} ({} bytes)",
            redacted_url(*scheme, host, *port, endpoint),
            json.len()
        );

        let response = transport.post(&PostRequest {
            url: &url,
            content_type: JSON_CONTENT_TYPE,
            body: json,
        })?;
        trace_response(&response);

        if response.status == OK_STATUS {
            Ok(())
        } else {
            Err(SendError::Status(response.status))
        }
    }

    fn report(&self, result: Result<(), SendError>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                self.logger().log(&err.to_string());
                false
            }
        }
    }
}

fn trace_response(response: &HttpResponse) {
    if !log_enabled!(Level::Trace) {
        return;
    }
    trace!(
        "HTTP POST response: {} {}",
        response.status, response.status_text
    );
    for (name, value) in &response.headers {
        trace!("  {name}: {value}");
    }
    trace!("body ({} bytes): {}", response.body.len(), response.body);
}

impl<T> fmt::Debug for ThingsBoard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThingsBoard")
            .field("scheme", &self.config.scheme)
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("has_token", &self.config.token().is_some())
            .field("has_transport", &self.transport.is_some())
            .finish()
    }
}
