//! Defines the [`ContractError`] type.

use cosmwasm_std::StdError;
use ica_packet::CodecError;
use thiserror::Error;

use crate::state::ChannelStatus;

/// Error types that can be returned by contract operations
#[derive(Error, Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum ContractError {
    /// Standard `CosmWasm` error
    #[error("{0}")]
    Std(#[from] StdError),

    /// The batch could not be encoded into a packet
    #[error("packet encoding failed: {0}")]
    Codec(#[from] CodecError),

    /// Packets can only be sent over an open channel
    #[error("channel is not open, current status: {status}")]
    ChannelNotOpen {
        /// The status of the current channel
        status: ChannelStatus,
    },

    /// A handshake is in flight or the channel is open
    #[error("a channel is already active, current status: {status}")]
    ChannelAlreadyActive {
        /// The status of the current channel
        status: ChannelStatus,
    },

    /// The caller is not the owner
    #[error("unauthorized")]
    Unauthorized,

    /// The caller is not the pending owner
    #[error("caller is not the pending owner")]
    NotPendingOwner,

    /// The channel open init was not requested through `create_channel`
    #[error("channel open init is only allowed after create_channel")]
    ChannelOpenInitNotAllowed,

    /// No options were given and none are stored
    #[error("no channel open init options given or stored")]
    NoChannelOpenInitOptions,

    /// Interchain account channels are ordered
    #[error("invalid channel ordering, expected ordered")]
    InvalidChannelOrdering,

    /// The counterparty port is not the host port
    #[error("invalid host port: expected {expected}, got {actual}")]
    InvalidHostPort {
        /// The expected host port
        expected: String,
        /// The counterparty port of the channel
        actual: String,
    },

    /// The handshake was started by the counterparty
    #[error("channel handshake must be initiated by the controller chain")]
    InvalidHandshakeInitiator,

    /// The version metadata is not valid JSON metadata
    #[error("invalid version metadata: {0}")]
    InvalidMetadata(#[source] serde_json::Error),

    /// The metadata names an unsupported ICS-27 version
    #[error("unsupported ics27 version: {0}")]
    UnsupportedVersion(String),

    /// The metadata names an unsupported transaction type
    #[error("unsupported tx type: {0}")]
    UnsupportedTxType(String),

    /// A metadata field does not match the channel or our proposal
    #[error("metadata mismatch on {field}: expected {expected}, got {actual}")]
    MetadataMismatch {
        /// The mismatched field
        field: &'static str,
        /// The expected value
        expected: String,
        /// The received value
        actual: String,
    },

    /// The host did not report an interchain account address
    #[error("the host did not return an interchain account address")]
    EmptyIcaAddress,

    /// A handshake callback for a channel this contract is not tracking
    #[error("handshake callback for channel {channel_id} does not match the tracked channel {tracked_channel_id} ({status})")]
    HandshakeMismatch {
        /// The channel named in the callback
        channel_id: String,
        /// The channel the contract tracks
        tracked_channel_id: String,
        /// The status of the tracked channel
        status: ChannelStatus,
    },

    /// The interchain account is not known yet
    #[error("interchain account info not found")]
    IcaInfoNotFound,

    /// A packet timeout must be in the future
    #[error("timeout must be at least one second")]
    InvalidTimeout,

    /// The `CosmosMsg` has no interchain account representation
    #[error("unsupported cosmos msg: {0}")]
    UnsupportedCosmosMsg(String),

    /// The stored contract name does not match this contract
    #[error("invalid migration: expected contract {expected}, got {actual}")]
    InvalidMigrationName {
        /// The name of this contract
        expected: String,
        /// The name in storage
        actual: String,
    },

    /// A reply for a sub message this contract never sent
    #[error("unknown reply id: {0}")]
    UnknownReplyId(u64),
}
