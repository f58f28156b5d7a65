//! The messages that are passed to and returned by the contract
#![allow(clippy::module_name_repetitions)]

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, CosmosMsg};
use ica_packet::{IcaMessage, TxEncoding};

use crate::state::{CallbackCounter, ChannelState, IcaInfo, Ownership, PendingPacket};

/// The message to instantiate the contract
#[cw_serde]
pub struct InstantiateMsg {
    /// The owner, defaults to the sender
    pub owner: Option<String>,
    /// If given, the first channel handshake is started right away
    pub channel_open_init_options: Option<ChannelOpenInitOptions>,
    /// Contract that receives packet and handshake callbacks
    pub send_callbacks_to: Option<String>,
    /// Packet timeout used when a send does not give one, defaults to 600
    pub default_timeout_seconds: Option<u64>,
}

/// The parameters of a channel handshake
#[cw_serde]
pub struct ChannelOpenInitOptions {
    /// The controller side connection
    pub connection_id: String,
    /// The host side connection
    pub counterparty_connection_id: String,
    /// The host port, defaults to `icahost`
    pub counterparty_port_id: Option<String>,
    /// Encoding of packet bodies, defaults to the previously negotiated one
    /// and then to `proto3`
    pub tx_encoding: Option<TxEncoding>,
}

/// A protobuf encoded message and its type URL
#[cw_serde]
pub struct ProtoMessage {
    /// The fully qualified type URL
    pub type_url: String,
    /// The protobuf encoded message
    pub value: Binary,
}

impl From<ProtoMessage> for IcaMessage {
    fn from(msg: ProtoMessage) -> Self {
        Self::new(msg.type_url, msg.value)
    }
}

/// The execute messages
#[cw_serde]
pub enum ExecuteMsg {
    /// Starts a channel handshake. Only allowed while no channel is open or
    /// opening. Without options, the stored options of the last handshake are
    /// used.
    CreateChannel {
        /// The handshake parameters
        channel_open_init_options: Option<ChannelOpenInitOptions>,
    },
    /// Sends a batch of type URL tagged protobuf messages as one packet
    SendMessages {
        /// The messages, executed atomically by the host
        messages: Vec<ProtoMessage>,
        /// The packet memo
        packet_memo: Option<String>,
        /// Seconds until the packet times out
        timeout_seconds: Option<u64>,
    },
    /// Sends a batch of `CosmosMsg`s as one packet, signed by the
    /// interchain account
    SendCosmosMsgs {
        /// The messages, executed atomically by the host
        messages: Vec<CosmosMsg>,
        /// The packet memo
        packet_memo: Option<String>,
        /// Seconds until the packet times out
        timeout_seconds: Option<u64>,
    },
    /// Sends an already encoded `CosmosTx` as the packet body
    SendCustomIcaMessages {
        /// The encoded `CosmosTx`
        messages: Binary,
        /// The packet memo
        packet_memo: Option<String>,
        /// Seconds until the packet times out
        timeout_seconds: Option<u64>,
    },
    /// Sets or clears the callback contract
    UpdateCallbackAddress {
        /// The new callback contract, `None` disables callbacks
        callback_address: Option<String>,
    },
    /// Transfers ownership in two steps
    UpdateOwnership(OwnershipAction),
}

/// Ownership transfer steps
#[cw_serde]
pub enum OwnershipAction {
    /// Proposes a new owner, callable by the owner
    TransferOwnership {
        /// The proposed owner
        new_owner: String,
    },
    /// Accepts a pending transfer, callable by the proposed owner
    AcceptOwnership {},
}

/// The query messages
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// The current channel
    #[returns(ChannelState)]
    GetChannel {},

    /// The interchain account and configuration
    #[returns(ContractStateResponse)]
    GetContractState {},

    /// The packet outcome counters
    #[returns(CallbackCounter)]
    GetCallbackCounter {},

    /// The owner and pending owner
    #[returns(Ownership)]
    Ownership {},

    /// A packet awaiting its acknowledgement or timeout
    #[returns(Option<PendingPacket>)]
    GetPendingPacket {
        /// The source channel
        channel_id: String,
        /// The packet sequence
        sequence: u64,
    },
}

/// The message to migrate the contract
#[cw_serde]
pub struct MigrateMsg {}

/// Response to [`QueryMsg::GetContractState`]
#[cw_serde]
pub struct ContractStateResponse {
    /// The interchain account, once a handshake completed
    pub ica_info: Option<IcaInfo>,
    /// The callback contract
    pub callback_address: Option<Addr>,
    /// Whether a channel open init is expected
    pub allow_channel_open_init: bool,
    /// The options of the last handshake
    pub channel_open_init_options: Option<ChannelOpenInitOptions>,
    /// Timeout applied when a send does not give one
    pub default_timeout_seconds: u64,
}

/// Data set on the response of every send
#[cw_serde]
pub struct SendPacketResponse {
    /// The sequence of the sent packet
    pub sequence: u64,
}

#[cfg(test)]
mod tests {
    use cosmwasm_std::from_json;

    use super::{ExecuteMsg, OwnershipAction};

    #[test]
    fn test_update_ownership_wire_format() {
        let msg: ExecuteMsg =
            from_json(br#"{"update_ownership":{"accept_ownership":{}}}"#).unwrap();
        assert_eq!(
            ExecuteMsg::UpdateOwnership(OwnershipAction::AcceptOwnership {}),
            msg
        );

        let msg: ExecuteMsg = from_json(
            br#"{"update_ownership":{"transfer_ownership":{"new_owner":"cosmos1owner"}}}"#,
        )
        .unwrap();
        assert_eq!(
            ExecuteMsg::UpdateOwnership(OwnershipAction::TransferOwnership {
                new_owner: "cosmos1owner".to_string(),
            }),
            msg
        );

        // the bare string form of a unit variant is not accepted
        from_json::<ExecuteMsg>(br#"{"update_ownership":"accept_ownership"}"#).unwrap_err();
    }
}
