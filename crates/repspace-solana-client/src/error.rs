//! Error types for the repspace client protocol layer.
//!
//! The taxonomy separates local validation failures (caught before any
//! derivation or network access) from decode failures, derivation
//! exhaustion, privilege misses, and opaque transport failures.

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Strict record decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Buffer is shorter than the fixed minimum for the record kind.
    #[error("account data too short: got {got} bytes, need at least {need}")]
    TooShort { got: usize, need: usize },

    /// The 8-byte discriminator does not match the expected record kind.
    #[error("wrong account kind: expected discriminator {expected}, found {found}")]
    WrongKind { expected: String, found: String },

    /// A declared string length would read past the end of the buffer.
    #[error("string field of {declared} bytes exceeds remaining {remaining} bytes")]
    StringOutOfBounds { declared: usize, remaining: usize },

    /// String field bytes are not valid UTF-8.
    #[error("string field is not valid UTF-8")]
    Utf8,
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// Bad caller-supplied input, detected before any derivation or I/O.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// No valid bump found for the seed set. Effectively unreachable, but
    /// reported rather than panicking.
    #[error("no valid program address for the given seeds")]
    Derivation,

    /// Caller is not the configured privileged identity.
    #[error("caller is not the privileged admin identity")]
    Unauthorized,

    /// Opaque failure from the read or submit capability.
    #[error("transport error: {0}")]
    Transport(String),

    /// Some batches landed before one failed. Already-submitted batches are
    /// not rolled back.
    #[error("batch {failed_index} failed after {succeeded} batches succeeded: {source}")]
    PartialBatchFailure {
        succeeded: usize,
        failed_index: usize,
        #[source]
        source: Box<ClientError>,
    },
}

impl ClientError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        ClientError::InvalidInput(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        ClientError::Transport(msg.into())
    }
}
