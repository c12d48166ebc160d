//! Bounded JSON payload construction.
//!
//! Payloads are built in a [`JsonDocument`] with a fixed field capacity and
//! then rendered into a caller-supplied byte buffer. Neither step grows
//! memory on demand: exceeding the field capacity or the buffer size is an
//! explicit [`PayloadError`], mirroring the budget of the constrained devices
//! this client targets.

mod document;
mod render;

use thiserror::Error;

pub use document::JsonDocument;
pub(crate) use render::ByteCounter;

/// Errors raised while building or rendering a payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The document already holds its maximum number of fields.
    #[error("JSON document is full ({capacity} fields)")]
    CapacityExceeded { capacity: usize },
    /// A field was written into a scalar root, or a scalar into an object.
    #[error("cannot write {attempted} into a JSON {found}")]
    TypeMismatch {
        attempted: &'static str,
        found: &'static str,
    },
    /// JSON has no representation for NaN or infinities.
    #[error("non-finite number {0} cannot be encoded as JSON")]
    NonFiniteNumber(f32),
    /// Rendered text plus its terminator does not fit the output buffer.
    #[error("too small buffer for JSON data: need {required} bytes, have {capacity}")]
    BufferTooSmall { required: usize, capacity: usize },
    /// The JSON encoder failed.
    #[error("JSON encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}
