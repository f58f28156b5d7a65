//! State management for the interchain account controller.
//!
//! The channel and the interchain account are stored as separate records: a
//! re-opened channel replaces [`ChannelState`] while [`IcaInfo`] keeps the
//! account address.

use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, IbcChannel, IbcOrder, Timestamp};
use cw_storage_plus::{Item, Map};
use ica_packet::TxEncoding;

use crate::msg::ChannelOpenInitOptions;

/// Timeout applied to packets when the caller does not give one.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 600;

/// The owner of the contract
pub const OWNERSHIP: Item<Ownership> = Item::new("ownership");
/// Instantiation time configuration
pub const CONFIG: Item<ContractConfig> = Item::new("config");
/// The current channel
pub const CHANNEL_STATE: Item<ChannelState> = Item::new("channel_state");
/// The interchain account, set by the first successful handshake
pub const ICA_INFO: Item<IcaInfo> = Item::new("ica_info");
/// Packet outcome counters
pub const CALLBACK_COUNTER: Item<CallbackCounter> = Item::new("callback_counter");
/// Contract that receives packet and handshake callbacks
pub const CALLBACK_ADDRESS: Item<Option<Addr>> = Item::new("callback_address");
/// The options of the last `create_channel`
pub const CHANNEL_OPEN_INIT_OPTIONS: Item<ChannelOpenInitOptions> =
    Item::new("channel_open_init_options");
/// Set by `create_channel`, consumed by the channel open init callback
pub const ALLOW_CHANNEL_OPEN_INIT: Item<bool> = Item::new("allow_channel_open_init");
/// Packets awaiting an acknowledgement or timeout, by channel and sequence
pub const PENDING_PACKETS: Map<(&str, u64), PendingPacket> = Map::new("pending_packets");

/// The controller port of a contract.
#[must_use]
pub fn controller_port_id(contract_address: &Addr) -> String {
    format!("wasm.{contract_address}")
}

/// Owner of the contract and, during a transfer, the proposed new owner.
#[cw_serde]
pub struct Ownership {
    /// The current owner
    pub owner: Addr,
    /// The address that may accept ownership
    pub pending_owner: Option<Addr>,
}

/// Configuration fixed at instantiation.
#[cw_serde]
pub struct ContractConfig {
    /// Timeout applied when a send does not specify one
    pub default_timeout_seconds: u64,
}

/// Lifecycle of an IBC channel, named as in ibc-go.
///
/// `TryOpen`, `Flushing` and `FlushComplete` are never entered by a
/// controller, which runs neither open try nor channel upgrades. They exist so
/// every ibc-go state name round-trips.
#[cw_serde]
#[derive(Copy, Eq, Default)]
pub enum ChannelStatus {
    /// No handshake has started
    #[default]
    #[serde(rename = "STATE_UNINITIALIZED_UNSPECIFIED")]
    Uninitialized,
    /// Open init was executed
    #[serde(rename = "STATE_INIT")]
    Init,
    /// Open try was executed
    #[serde(rename = "STATE_TRYOPEN")]
    TryOpen,
    /// The handshake completed
    #[serde(rename = "STATE_OPEN")]
    Open,
    /// The channel was closed
    #[serde(rename = "STATE_CLOSED")]
    Closed,
    /// An upgrade is flushing in-flight packets
    #[serde(rename = "STATE_FLUSHING")]
    Flushing,
    /// An upgrade finished flushing
    #[serde(rename = "STATE_FLUSHCOMPLETE")]
    FlushComplete,
}

impl ChannelStatus {
    /// The ibc-go name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "STATE_UNINITIALIZED_UNSPECIFIED",
            Self::Init => "STATE_INIT",
            Self::TryOpen => "STATE_TRYOPEN",
            Self::Open => "STATE_OPEN",
            Self::Closed => "STATE_CLOSED",
            Self::Flushing => "STATE_FLUSHING",
            Self::FlushComplete => "STATE_FLUSHCOMPLETE",
        }
    }

    /// Whether a new handshake would conflict with this channel.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Uninitialized | Self::Closed)
    }
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One channel instance of the controller port.
#[cw_serde]
pub struct ChannelState {
    /// Lifecycle status
    pub channel_status: ChannelStatus,
    /// The controller port, `wasm.<contract address>`
    pub port_id: String,
    /// The channel id, empty before the first handshake
    pub channel_id: String,
    /// The host port
    pub counterparty_port_id: String,
    /// The host channel id, known once the channel is open
    pub counterparty_channel_id: Option<String>,
    /// The controller connection
    pub connection_id: String,
    /// Channel ordering
    pub ordering: IbcOrder,
    /// The version metadata, as proposed during init and as agreed once open
    pub version: String,
    /// Sequence of the next packet sent on this channel
    pub next_sequence_send: u64,
}

impl ChannelState {
    /// The record written at instantiation, before any handshake.
    #[must_use]
    pub fn uninitialized(port_id: String) -> Self {
        Self {
            channel_status: ChannelStatus::Uninitialized,
            port_id,
            channel_id: String::new(),
            counterparty_port_id: String::new(),
            counterparty_channel_id: None,
            connection_id: String::new(),
            ordering: IbcOrder::Ordered,
            version: String::new(),
            next_sequence_send: 1,
        }
    }

    /// A fresh channel instance in `Init`.
    #[must_use]
    pub fn init(channel: &IbcChannel, version: String) -> Self {
        Self {
            channel_status: ChannelStatus::Init,
            port_id: channel.endpoint.port_id.clone(),
            channel_id: channel.endpoint.channel_id.clone(),
            counterparty_port_id: channel.counterparty_endpoint.port_id.clone(),
            counterparty_channel_id: None,
            connection_id: channel.connection_id.clone(),
            ordering: channel.order.clone(),
            version,
            next_sequence_send: 1,
        }
    }

    /// Completes the handshake.
    pub fn open(&mut self, counterparty_channel_id: String, version: String) {
        self.channel_status = ChannelStatus::Open;
        self.counterparty_channel_id = Some(counterparty_channel_id);
        self.version = version;
    }

    /// Marks the channel closed.
    pub fn close(&mut self) {
        self.channel_status = ChannelStatus::Closed;
    }

    /// Whether packets can be sent.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.channel_status == ChannelStatus::Open
    }

    /// Allocates the sequence of the next packet.
    pub fn next_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence_send;
        self.next_sequence_send += 1;
        sequence
    }
}

/// The interchain account controlled by this contract.
#[cw_serde]
pub struct IcaInfo {
    /// The account address on the host chain
    pub ica_address: String,
    /// The channel the account was last bound to
    pub channel_id: String,
    /// The encoding negotiated for the channel
    pub encoding: TxEncoding,
}

/// Number of packets per outcome.
#[cw_serde]
#[derive(Default)]
pub struct CallbackCounter {
    /// Successful acknowledgements
    pub success: u64,
    /// Error acknowledgements
    pub error: u64,
    /// Timeouts
    pub timeout: u64,
}

impl CallbackCounter {
    /// Records a successful acknowledgement.
    pub fn success(&mut self) {
        self.success += 1;
    }

    /// Records an error acknowledgement.
    pub fn error(&mut self) {
        self.error += 1;
    }

    /// Records a timeout.
    pub fn timeout(&mut self) {
        self.timeout += 1;
    }
}

/// A packet that has neither been acknowledged nor timed out.
#[cw_serde]
pub struct PendingPacket {
    /// The source channel
    pub channel_id: String,
    /// The packet sequence
    pub sequence: u64,
    /// Type URLs of the messages, empty for custom payloads
    pub type_urls: Vec<String>,
    /// The packet memo
    pub memo: String,
    /// When the packet times out
    pub timeout_timestamp: Timestamp,
}
