//! Defines the [`CodecError`] type.

use thiserror::Error;

/// Errors returned while encoding or decoding interchain account packets
#[derive(Error, Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum CodecError {
    /// The type URL has no entry in the type registry
    #[error("unknown type url: {0}")]
    UnknownTypeUrl(String),

    /// The message bytes do not decode as the type registered for its URL
    #[error("message {type_url} does not decode as its registered type: {source}")]
    InvalidMessage {
        /// The type URL of the rejected message
        type_url: String,
        /// The underlying decoding failure
        #[source]
        source: prost::DecodeError,
    },

    /// A packet needs at least one message
    #[error("packet must contain at least one message")]
    EmptyMessages,

    /// A packet needs a non-empty body
    #[error("packet data must not be empty")]
    EmptyPacketData,

    /// The memo exceeds the maximum length accepted by the host
    #[error("memo is {len} bytes long, the maximum is {max}")]
    MemoTooLong {
        /// Length of the rejected memo, in bytes
        len: usize,
        /// Maximum accepted length
        max: usize,
    },

    /// Only `TYPE_EXECUTE_TX` packets are sent by controllers
    #[error("unsupported packet type: {0}")]
    InvalidPacketType(i32),

    /// The encoding string is not one of `proto3` or `proto3json`
    #[error("unsupported tx encoding: {0}")]
    UnsupportedEncoding(String),

    // Generic translation errors
    /// Prost decoding error
    #[error("prost decoding error: {0}")]
    ProstDecodeError(#[from] prost::DecodeError),

    /// Serde JSON error
    #[error("serde json error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}
