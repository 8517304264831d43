//! Error types.
//!
//! `CryptoError` is raised only for contract breaches by the caller (mismatched
//! parallel inputs, a signer index outside its ring, secrets that do not belong
//! to the given public keys). Untrusted data never produces it: verification
//! functions answer `false` and receiver-side derivations answer `None`.

use thiserror::Error;

/// Invariant violations raised by generation and sender-side operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Parallel inputs of an operation disagree in length.
    #[error("{operation}: `{field}` has {actual} entries, expected {expected}")]
    LengthMismatch {
        operation: &'static str,
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A chosen index lies outside the ring it selects from.
    #[error("{operation}: index {index} is out of range for a ring of {len}")]
    IndexOutOfRange {
        operation: &'static str,
        index: usize,
        len: usize,
    },

    /// An aggregate operation was called without any inputs.
    #[error("{0}: no inputs supplied")]
    NoInputs(&'static str),

    /// The supplied secret does not correspond to the supplied public data.
    #[error("{0}: keys do not match")]
    KeyMismatch(&'static str),

    /// A caller-owned public key does not decode to a curve point.
    #[error("{0}: invalid public key")]
    InvalidPublicKey(&'static str),
}

/// Failures decoding fixed-width values from hex or raw bytes.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("scalar is not canonically reduced")]
    NonCanonicalScalar,
}

/// Failures installing the global tracing subscriber.
#[cfg(feature = "telemetry")]
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to install the log bridge: {0}")]
    LogBridge(#[from] log::SetLoggerError),

    #[error("failed to set the global subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}
