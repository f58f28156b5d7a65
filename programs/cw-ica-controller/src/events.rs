//! Events emitted by the controller.

use cosmwasm_std::{Event, Timestamp};

use crate::state::IcaInfo;

/// Event types
pub mod types {
    /// A handshake was started
    pub const CHANNEL_OPEN_INIT: &str = "ica_channel_open_init";
    /// A handshake completed
    pub const CHANNEL_OPEN_ACK: &str = "ica_channel_open_ack";
    /// The channel was closed
    pub const CHANNEL_CLOSE: &str = "ica_channel_close";
    /// A packet was sent
    pub const PACKET_SENT: &str = "ica_packet_sent";
    /// A packet was acknowledged
    pub const PACKET_ACK: &str = "ica_packet_ack";
    /// A packet timed out
    pub const PACKET_TIMEOUT: &str = "ica_packet_timeout";
    /// A handshake callback was ignored
    pub const HANDSHAKE_MISMATCH: &str = "ica_handshake_mismatch";
    /// A forwarded callback failed
    pub const CALLBACK_FAILED: &str = "ica_callback_failed";
}

/// Attribute keys
pub mod attributes {
    /// The channel id
    pub const CHANNEL_ID: &str = "channel_id";
    /// The connection id
    pub const CONNECTION_ID: &str = "connection_id";
    /// The counterparty port id
    pub const COUNTERPARTY_PORT_ID: &str = "counterparty_port_id";
    /// The packet sequence
    pub const SEQUENCE: &str = "sequence";
    /// Number of messages in the packet
    pub const MESSAGE_COUNT: &str = "message_count";
    /// Packet timeout in nanoseconds since the epoch
    pub const TIMEOUT_TIMESTAMP: &str = "timeout_timestamp";
    /// `success` or `error`
    pub const OUTCOME: &str = "outcome";
    /// The error of a failed acknowledgement or callback
    pub const ERROR: &str = "error";
    /// Whether the packet was tracked as pending
    pub const PENDING_PACKET_FOUND: &str = "pending_packet_found";
    /// The interchain account
    pub const ICA_ADDRESS: &str = "ica_address";
    /// The interchain account before a re-open
    pub const PREVIOUS_ICA_ADDRESS: &str = "previous_ica_address";
    /// The packet encoding
    pub const ENCODING: &str = "encoding";
    /// The handshake step of an ignored callback
    pub const STEP: &str = "step";
}

/// A handshake was started.
#[must_use]
pub fn channel_open_init(connection_id: &str, counterparty_port_id: &str) -> Event {
    Event::new(types::CHANNEL_OPEN_INIT)
        .add_attribute(attributes::CONNECTION_ID, connection_id)
        .add_attribute(attributes::COUNTERPARTY_PORT_ID, counterparty_port_id)
}

/// A handshake completed.
#[must_use]
pub fn channel_open_ack(ica_info: &IcaInfo) -> Event {
    Event::new(types::CHANNEL_OPEN_ACK)
        .add_attribute(attributes::CHANNEL_ID, &ica_info.channel_id)
        .add_attribute(attributes::ICA_ADDRESS, &ica_info.ica_address)
        .add_attribute(attributes::ENCODING, ica_info.encoding.as_str())
}

/// The channel was closed.
#[must_use]
pub fn channel_close(channel_id: &str) -> Event {
    Event::new(types::CHANNEL_CLOSE).add_attribute(attributes::CHANNEL_ID, channel_id)
}

/// A packet was sent.
#[must_use]
pub fn packet_sent(
    channel_id: &str,
    sequence: u64,
    message_count: usize,
    timeout: Timestamp,
) -> Event {
    Event::new(types::PACKET_SENT)
        .add_attribute(attributes::CHANNEL_ID, channel_id)
        .add_attribute(attributes::SEQUENCE, sequence.to_string())
        .add_attribute(attributes::MESSAGE_COUNT, message_count.to_string())
        .add_attribute(attributes::TIMEOUT_TIMESTAMP, timeout.nanos().to_string())
}

/// A packet was acknowledged, with the host's error if it failed.
#[must_use]
pub fn packet_ack(channel_id: &str, sequence: u64, error: Option<&str>) -> Event {
    let event = Event::new(types::PACKET_ACK)
        .add_attribute(attributes::CHANNEL_ID, channel_id)
        .add_attribute(attributes::SEQUENCE, sequence.to_string());

    match error {
        None => event.add_attribute(attributes::OUTCOME, "success"),
        Some(error) => event
            .add_attribute(attributes::OUTCOME, "error")
            .add_attribute(attributes::ERROR, error),
    }
}

/// A packet timed out.
#[must_use]
pub fn packet_timeout(channel_id: &str, sequence: u64) -> Event {
    Event::new(types::PACKET_TIMEOUT)
        .add_attribute(attributes::CHANNEL_ID, channel_id)
        .add_attribute(attributes::SEQUENCE, sequence.to_string())
}

/// A handshake callback was ignored.
#[must_use]
pub fn handshake_mismatch(step: &str, channel_id: &str, reason: &str) -> Event {
    Event::new(types::HANDSHAKE_MISMATCH)
        .add_attribute(attributes::STEP, step)
        .add_attribute(attributes::CHANNEL_ID, channel_id)
        .add_attribute(attributes::ERROR, reason)
}

/// A forwarded callback failed.
#[must_use]
pub fn callback_failed(error: &str) -> Event {
    Event::new(types::CALLBACK_FAILED).add_attribute(attributes::ERROR, error)
}
