//! Builder for [`ClientConfig`].
//!
//! Every setter is optional. `build` fills gaps from [`ClientConfig`]'s
//! defaults, picks the scheme's well-known port when none was given, and
//! rejects values the client could never work with.

use std::time::Duration;

use super::{ClientConfig, ConfigError, Scheme};
use crate::transport::{TlsOptions, TransportOptions};

macro_rules! ensure_positive {
    ($value:expr, $field:expr) => {{
        if $value == 0 {
            Err(ConfigError::InvalidConfig(format!(
                "{} must be greater than zero",
                $field
            )))
        } else {
            Ok($value)
        }
    }};
}

macro_rules! option_setter {
    ($(#[$meta:meta])* $fn_name:ident, $field:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $fn_name(mut self, value: $ty) -> Self {
            self.$field = Some(value);
            self
        }
    };
}

/// Smallest payload buffer that can hold any JSON text plus its terminator.
const MIN_PAYLOAD_SIZE: usize = 2;
/// Largest accepted payload buffer and field capacity.
pub const MAX_CAPACITY: usize = u16::MAX as usize;

/// Builder for constructing validated [`ClientConfig`] values.
#[derive(Clone, Debug, Default)]
pub struct ClientConfigBuilder {
    scheme: Option<Scheme>,
    host: Option<String>,
    port: Option<u16>,
    access_token: Option<String>,
    payload_size: Option<usize>,
    max_fields: Option<usize>,
    connect_timeout_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
    insecure_skip_verify: Option<bool>,
}

impl ClientConfigBuilder {
    /// Create a new builder with nothing configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server host name or address (required).
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the device access token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    option_setter!(
        #[doc = "Select HTTP or HTTPS. Defaults to HTTP."]
        with_scheme,
        scheme,
        Scheme
    );
    option_setter!(
        #[doc = "Set the server port. Defaults to the scheme's well-known port."]
        with_port,
        port,
        u16
    );
    option_setter!(
        #[doc = "Set the payload buffer size in bytes, terminator included."]
        with_payload_size,
        payload_size,
        usize
    );
    option_setter!(
        #[doc = "Set the maximum number of records per batched send."]
        with_max_fields,
        max_fields,
        usize
    );
    option_setter!(
        #[doc = "Set the connect timeout in milliseconds."]
        with_connect_timeout_ms,
        connect_timeout_ms,
        u64
    );
    option_setter!(
        #[doc = "Set the per-request timeout in milliseconds."]
        with_request_timeout_ms,
        request_timeout_ms,
        u64
    );
    option_setter!(
        #[doc = "Disable TLS certificate and hostname checks (tests only)."]
        with_insecure_skip_verify,
        insecure_skip_verify,
        bool
    );

    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_host()?;
        self.validate_port()?;
        self.validate_capacities()?;
        self.validate_timeouts()?;
        Ok(())
    }

    fn validate_host(&self) -> Result<(), ConfigError> {
        match &self.host {
            None => Err(ConfigError::InvalidConfig(
                "client requires a host".into(),
            )),
            Some(host) if host.trim().is_empty() => Err(ConfigError::InvalidConfig(
                "host must not be empty".into(),
            )),
            _ => Ok(()),
        }
    }

    fn validate_port(&self) -> Result<(), ConfigError> {
        if let Some(port) = self.port {
            ensure_positive!(port, "port")?;
        }
        Ok(())
    }

    fn validate_capacities(&self) -> Result<(), ConfigError> {
        if let Some(size) = self.payload_size
            && !(MIN_PAYLOAD_SIZE..=MAX_CAPACITY).contains(&size)
        {
            return Err(ConfigError::InvalidConfig(format!(
                "payload_size must be between {MIN_PAYLOAD_SIZE} and {MAX_CAPACITY}"
            )));
        }
        if let Some(fields) = self.max_fields {
            ensure_positive!(fields, "max_fields")?;
            if fields > MAX_CAPACITY {
                return Err(ConfigError::InvalidConfig(format!(
                    "max_fields must not exceed {MAX_CAPACITY}"
                )));
            }
        }
        Ok(())
    }

    fn validate_timeouts(&self) -> Result<(), ConfigError> {
        if let Some(timeout) = self.connect_timeout_ms {
            ensure_positive!(timeout, "connect_timeout_ms")?;
        }
        if let Some(timeout) = self.request_timeout_ms {
            ensure_positive!(timeout, "request_timeout_ms")?;
        }
        Ok(())
    }

    /// Validate the collected settings and produce a [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidConfig`] when the host is missing or blank, or
    /// when a port, capacity, or timeout is zero. A missing access token is
    /// accepted; sends fail until one is supplied.
    pub fn build(&self) -> Result<ClientConfig, ConfigError> {
        self.validate()?;

        let defaults = ClientConfig::default();
        let transport_defaults = defaults.transport;
        let scheme = self.scheme.unwrap_or(defaults.scheme);
        Ok(ClientConfig {
            scheme,
            host: self.host.clone().unwrap_or_default().trim().to_owned(),
            port: self.port.unwrap_or_else(|| scheme.default_port()),
            access_token: self.access_token.clone(),
            payload_size: self.payload_size.unwrap_or(defaults.payload_size),
            max_fields: self.max_fields.unwrap_or(defaults.max_fields),
            transport: TransportOptions {
                connect_timeout: self
                    .connect_timeout_ms
                    .map_or(transport_defaults.connect_timeout, Duration::from_millis),
                request_timeout: self
                    .request_timeout_ms
                    .map_or(transport_defaults.request_timeout, Duration::from_millis),
                tls: TlsOptions {
                    insecure_skip_verify: self
                        .insecure_skip_verify
                        .unwrap_or(transport_defaults.tls.insecure_skip_verify),
                },
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn base() -> ClientConfigBuilder {
        ClientConfigBuilder::new().with_host("demo.thingsboard.io")
    }

    #[rstest]
    fn defaults_fill_unset_fields() {
        let config = base().build().expect("build");
        assert_eq!(config.scheme, Scheme::Http);
        assert_eq!(config.port, 80);
        assert_eq!(config.payload_size, 64);
        assert_eq!(config.max_fields, 8);
        assert_eq!(config.access_token, None);
        assert_eq!(config.transport, TransportOptions::default());
    }

    #[rstest]
    fn https_defaults_to_port_443() {
        let config = base().with_scheme(Scheme::Https).build().expect("build");
        assert_eq!(config.port, 443);
    }

    #[rstest]
    fn explicit_values_are_kept() {
        let config = base()
            .with_scheme(Scheme::Https)
            .with_port(8443)
            .with_access_token("A1_TEST_TOKEN")
            .with_payload_size(256)
            .with_max_fields(16)
            .with_connect_timeout_ms(250)
            .with_request_timeout_ms(1500)
            .with_insecure_skip_verify(true)
            .build()
            .expect("build");
        assert_eq!(config.port, 8443);
        assert_eq!(config.token(), Some("A1_TEST_TOKEN"));
        assert_eq!(config.payload_size, 256);
        assert_eq!(config.max_fields, 16);
        assert_eq!(config.transport.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.transport.request_timeout, Duration::from_millis(1500));
        assert!(config.transport.tls.insecure_skip_verify);
    }

    #[rstest]
    fn largest_capacities_are_accepted() {
        let config = base()
            .with_payload_size(MAX_CAPACITY)
            .with_max_fields(MAX_CAPACITY)
            .build()
            .expect("build");
        assert_eq!(config.payload_size, MAX_CAPACITY);
        assert_eq!(config.max_fields, MAX_CAPACITY);
    }

    #[rstest]
    #[case(ClientConfigBuilder::new(), "requires a host")]
    #[case(ClientConfigBuilder::new().with_host("  "), "must not be empty")]
    #[case(base().with_port(0), "port")]
    #[case(base().with_payload_size(1), "payload_size")]
    #[case(base().with_payload_size(MAX_CAPACITY + 1), "payload_size")]
    #[case(base().with_payload_size(usize::MAX), "payload_size")]
    #[case(base().with_max_fields(0), "max_fields")]
    #[case(base().with_max_fields(usize::MAX), "max_fields")]
    #[case(base().with_connect_timeout_ms(0), "connect_timeout_ms")]
    #[case(base().with_request_timeout_ms(0), "request_timeout_ms")]
    fn invalid_values_are_rejected(#[case] builder: ClientConfigBuilder, #[case] fragment: &str) {
        let err = builder.build().expect_err("invalid");
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
        assert!(err.to_string().contains(fragment), "{err}");
    }
}
