//! TLS settings for HTTPS transports.

use std::{io, sync::Arc};

use native_tls::TlsConnector;

/// TLS connection options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TlsOptions {
    /// Skip certificate and hostname validation when true (intended for tests).
    pub insecure_skip_verify: bool,
}

impl TlsOptions {
    pub(crate) fn connector(&self) -> io::Result<Arc<TlsConnector>> {
        let mut builder = TlsConnector::builder();
        if self.insecure_skip_verify {
            builder.danger_accept_invalid_certs(true);
            builder.danger_accept_invalid_hostnames(true);
        }
        builder.build().map(Arc::new).map_err(io::Error::other)
    }
}
