//! Messages exchanged with the IBC module.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{AnyMsg, Binary, CosmosMsg};
use ibc_proto::ibc::core::channel::v1::{
    Channel, Counterparty, MsgChannelOpenInit, Order, State,
};
use prost::Message;

/// Type URL of `MsgChannelOpenInit`
pub const MSG_CHANNEL_OPEN_INIT_TYPE_URL: &str = "/ibc.core.channel.v1.MsgChannelOpenInit";

/// The acknowledgement written by ICS-27 hosts.
#[cw_serde]
pub enum AcknowledgementData {
    /// The `MsgResponse`s of the executed messages
    Result(Binary),
    /// Why the transaction failed
    Error(String),
}

/// Builds the `MsgChannelOpenInit` that starts a handshake from the
/// controller port.
#[must_use]
pub fn channel_open_init_msg(
    signer: String,
    port_id: String,
    connection_id: String,
    counterparty_port_id: String,
    version: String,
) -> CosmosMsg {
    let msg = MsgChannelOpenInit {
        port_id,
        channel: Some(Channel {
            state: State::Init.into(),
            ordering: Order::Ordered.into(),
            counterparty: Some(Counterparty {
                port_id: counterparty_port_id,
                channel_id: String::new(),
            }),
            connection_hops: vec![connection_id],
            version,
            ..Default::default()
        }),
        signer,
    };

    CosmosMsg::Any(AnyMsg {
        type_url: MSG_CHANNEL_OPEN_INIT_TYPE_URL.to_string(),
        value: Binary::from(msg.encode_to_vec()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_open_init_msg() {
        let msg = channel_open_init_msg(
            "cosmwasm1contract".to_string(),
            "wasm.cosmwasm1contract".to_string(),
            "connection-0".to_string(),
            "icahost".to_string(),
            "{}".to_string(),
        );

        let CosmosMsg::Any(AnyMsg { type_url, value }) = msg else {
            panic!("expected an Any message");
        };
        assert_eq!(MSG_CHANNEL_OPEN_INIT_TYPE_URL, type_url);

        let decoded = MsgChannelOpenInit::decode(value.as_slice()).unwrap();
        let channel = decoded.channel.unwrap();
        assert_eq!("wasm.cosmwasm1contract", decoded.port_id);
        assert_eq!("cosmwasm1contract", decoded.signer);
        assert_eq!(Order::Ordered as i32, channel.ordering);
        assert_eq!(vec!["connection-0".to_string()], channel.connection_hops);
        assert_eq!("icahost", channel.counterparty.unwrap().port_id);
    }

    #[test]
    fn test_acknowledgement_wire_format() {
        let ack: AcknowledgementData = cosmwasm_std::from_json(br#"{"result":"AQI="}"#).unwrap();
        assert_eq!(AcknowledgementData::Result(Binary::from(vec![1, 2])), ack);

        let ack: AcknowledgementData =
            cosmwasm_std::from_json(br#"{"error":"ABCI code: 5: error handling packet"}"#)
                .unwrap();
        assert_eq!(
            AcknowledgementData::Error("ABCI code: 5: error handling packet".to_string()),
            ack
        );
    }
}
