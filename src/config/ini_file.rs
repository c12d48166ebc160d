//! INI file support for [`ClientConfigBuilder`].
//!
//! Settings live in a single section:
//!
//! ```ini
//! [thingsboard]
//! scheme = https
//! host = demo.thingsboard.io
//! port = 443
//! access_token = A1_TEST_TOKEN
//! payload_size = 64
//! max_fields = 8
//! connect_timeout_ms = 5000
//! request_timeout_ms = 30000
//! insecure_skip_verify = false
//! ```
//!
//! Every key is optional at parse time; `build` applies the usual
//! validation. Unknown keys are rejected so typos do not silently fall back
//! to defaults.

use std::{fs, io::ErrorKind, path::Path, str::FromStr};

use ini::Ini;

use super::{ClientConfigBuilder, ConfigError, Scheme};

/// Name of the INI section holding client settings.
pub const INI_SECTION: &str = "thingsboard";

impl ClientConfigBuilder {
    /// Parse builder settings from INI text.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed INI, and
    /// [`ConfigError::InvalidConfig`] for a missing section, unknown keys,
    /// or values of the wrong type.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        let section = ini.section(Some(INI_SECTION)).ok_or_else(|| {
            ConfigError::InvalidConfig(format!("missing [{INI_SECTION}] section"))
        })?;

        let mut builder = Self::new();
        for (key, value) in section.iter() {
            builder = apply_entry(builder, key, value.trim())?;
        }
        Ok(builder)
    }

    /// Read and parse builder settings from an INI file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotFound`] when `path` does not exist,
    /// [`ConfigError::Io`] for other read failures, plus everything
    /// [`from_ini_str`](Self::from_ini_str) reports.
    pub fn from_ini_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Io(err),
        })?;
        Self::from_ini_str(&text)
    }
}

fn apply_entry(
    builder: ClientConfigBuilder,
    key: &str,
    value: &str,
) -> Result<ClientConfigBuilder, ConfigError> {
    Ok(match key {
        "scheme" => builder.with_scheme(value.parse::<Scheme>()?),
        "host" => builder.with_host(value),
        "port" => builder.with_port(parse_value(key, value)?),
        "access_token" => builder.with_access_token(value),
        "payload_size" => builder.with_payload_size(parse_value(key, value)?),
        "max_fields" => builder.with_max_fields(parse_value(key, value)?),
        "connect_timeout_ms" => builder.with_connect_timeout_ms(parse_value(key, value)?),
        "request_timeout_ms" => builder.with_request_timeout_ms(parse_value(key, value)?),
        "insecure_skip_verify" => builder.with_insecure_skip_verify(parse_flag(key, value)?),
        other => {
            return Err(ConfigError::InvalidConfig(format!(
                "unknown key {other:?} in [{INI_SECTION}]"
            )));
        }
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidConfig(format!("{key} has invalid value {value:?}")))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidConfig(format!(
            "{key} has invalid value {value:?}"
        ))),
    }
}
