//! Forwarding of packet and handshake outcomes to the callback contract.
//!
//! Forwards are sent as sub messages that only reply on error. The reply
//! handler records the failure and succeeds, so a failing callback contract
//! reverts its own execution but never the controller's bookkeeping.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    to_json_binary, Addr, Api, IbcChannel, IbcPacket, Response, StdResult, Storage, SubMsg,
    SubMsgResult, WasmMsg,
};
use ica_packet::TxEncoding;

use crate::{events, ibc::types::AcknowledgementData, state::CALLBACK_ADDRESS};

/// Reply id of forwarded callbacks
pub const FORWARD_CALLBACK_REPLY_ID: u64 = 1;

/// The callback delivered to the callback contract.
#[cw_serde]
pub enum IcaControllerCallbackMsg {
    /// A packet was acknowledged
    OnAcknowledgementPacketCallback {
        /// The host's acknowledgement
        ica_acknowledgement: AcknowledgementData,
        /// The acknowledged packet
        original_packet: IbcPacket,
        /// The relayer that delivered the acknowledgement
        relayer: Addr,
    },
    /// A packet timed out and the channel was closed
    OnTimeoutPacketCallback {
        /// The packet that timed out
        original_packet: IbcPacket,
        /// The relayer that delivered the timeout
        relayer: Addr,
    },
    /// A channel handshake completed
    OnChannelOpenAckCallback {
        /// The opened channel
        channel: IbcChannel,
        /// The interchain account
        ica_address: String,
        /// The negotiated encoding
        tx_encoding: TxEncoding,
    },
}

/// The execute message the callback contract must accept.
#[cw_serde]
pub enum ReceiverExecuteMsg {
    /// Delivers a callback
    ReceiveIcaCallback(IcaControllerCallbackMsg),
}

impl IcaControllerCallbackMsg {
    /// Wraps the callback into a sub message to `contract_addr`.
    /// # Errors
    /// Returns an error if the callback cannot be serialized.
    pub fn into_sub_msg(self, contract_addr: impl Into<String>) -> StdResult<SubMsg> {
        let msg = WasmMsg::Execute {
            contract_addr: contract_addr.into(),
            msg: to_json_binary(&ReceiverExecuteMsg::ReceiveIcaCallback(self))?,
            funds: vec![],
        };
        Ok(SubMsg::reply_on_error(msg, FORWARD_CALLBACK_REPLY_ID))
    }
}

/// The forward of `callback`, if a callback contract is registered.
/// # Errors
/// Returns an error if the callback address cannot be loaded.
pub fn forward(
    storage: &dyn Storage,
    callback: IcaControllerCallbackMsg,
) -> StdResult<Option<SubMsg>> {
    CALLBACK_ADDRESS
        .may_load(storage)?
        .flatten()
        .map(|addr| callback.into_sub_msg(addr))
        .transpose()
}

/// Handles the reply of a failed forward. Never fails.
#[must_use]
pub fn on_forward_reply(api: &dyn Api, result: &SubMsgResult) -> Response {
    match result {
        SubMsgResult::Err(err) => {
            api.debug(&format!("ica callback forward failed: {err}"));
            Response::new().add_event(events::callback_failed(err))
        }
        SubMsgResult::Ok(_) => Response::new(),
    }
}
