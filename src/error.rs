//! Send failure taxonomy.

use thiserror::Error;

use crate::config::Scheme;
use crate::payload::PayloadError;
use crate::transport::TransportError;

/// Why a send did not succeed.
///
/// The boolean `send_*` methods collapse every variant into `false` and
/// pass the message to the client's logger; the `try_send_*` methods
/// return it.
#[derive(Debug, Error)]
pub enum SendError {
    /// No access token configured, or it is empty.
    #[error("access token is not configured")]
    MissingToken,
    /// No transport attached yet.
    #[error("no transport attached to the {0} client")]
    MissingTransport(Scheme),
    /// Nothing to send.
    #[error("payload is empty")]
    EmptyPayload,
    /// Batch larger than the configured field capacity.
    #[error("too many JSON fields passed: {count} exceeds capacity of {capacity}")]
    TooManyFields { count: usize, capacity: usize },
    /// Serialisation or rendering failed.
    #[error("unable to serialize data: {0}")]
    Payload(#[from] PayloadError),
    /// No response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Server answered with a status other than 200.
    #[error("server responded with HTTP {0}")]
    Status(u16),
}

impl SendError {
    /// True when the failure happened before any request was attempted.
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::Transport(_) | Self::Status(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SendError::MissingToken, true)]
    #[case(SendError::MissingTransport(Scheme::Https), true)]
    #[case(SendError::EmptyPayload, true)]
    #[case(SendError::TooManyFields { count: 9, capacity: 8 }, true)]
    #[case(SendError::Payload(PayloadError::CapacityExceeded { capacity: 1 }), true)]
    #[case(SendError::Transport(TransportError::Request("boom".into())), false)]
    #[case(SendError::Status(500), false)]
    fn local_failures_never_reached_the_network(#[case] err: SendError, #[case] local: bool) {
        assert_eq!(err.is_local(), local);
    }

    #[rstest]
    fn messages_name_the_cause() {
        assert_eq!(
            SendError::MissingTransport(Scheme::Https).to_string(),
            "no transport attached to the https client"
        );
        assert_eq!(
            SendError::TooManyFields {
                count: 9,
                capacity: 8
            }
            .to_string(),
            "too many JSON fields passed: 9 exceeds capacity of 8"
        );
        assert_eq!(SendError::Status(404).to_string(), "server responded with HTTP 404");
    }
}
