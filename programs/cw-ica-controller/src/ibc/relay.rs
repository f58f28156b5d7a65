//! This module contains the entry points for:
//! - The IBC packet acknowledgement.
//! - The IBC packet timeout.
//! - The IBC packet receive.
//!
//! Outcomes are counted before anything is forwarded to the callback
//! contract.

use cosmwasm_std::{
    entry_point, from_json, to_json_binary, DepsMut, Env, IbcBasicResponse, IbcPacketAckMsg,
    IbcPacketReceiveMsg, IbcPacketTimeoutMsg, IbcReceiveResponse, Storage,
};

use crate::{
    callbacks::{self, IcaControllerCallbackMsg},
    events,
    ibc::types::AcknowledgementData,
    state::{CallbackCounter, CALLBACK_COUNTER, CHANNEL_STATE, PENDING_PACKETS},
    ContractError,
};

/// Error recorded for acknowledgements that are not ICS-27 acknowledgements.
pub const INVALID_ACKNOWLEDGEMENT: &str = "invalid acknowledgement";

/// Implements the IBC module's `OnAcknowledgementPacket` handler.
/// # Errors
/// Returns an error if storage access fails.
#[entry_point]
#[allow(clippy::needless_pass_by_value)]
pub fn ibc_packet_ack(
    deps: DepsMut,
    _env: Env,
    msg: IbcPacketAckMsg,
) -> Result<IbcBasicResponse, ContractError> {
    let IbcPacketAckMsg {
        acknowledgement,
        original_packet,
        relayer,
        ..
    } = msg;
    let channel_id = original_packet.src.channel_id.clone();
    let sequence = original_packet.sequence;

    let ack = from_json(&acknowledgement.data)
        .unwrap_or_else(|_| AcknowledgementData::Error(INVALID_ACKNOWLEDGEMENT.to_string()));

    let event = match &ack {
        AcknowledgementData::Result(_) => {
            update_counter(deps.storage, CallbackCounter::success)?;
            events::packet_ack(&channel_id, sequence, None)
        }
        AcknowledgementData::Error(error) => {
            update_counter(deps.storage, CallbackCounter::error)?;
            deps.api.debug(&format!(
                "packet {sequence} on {channel_id} failed on the host: {error}"
            ));
            events::packet_ack(&channel_id, sequence, Some(error))
        }
    };
    let found = take_pending(deps.storage, &channel_id, sequence);

    let mut response = IbcBasicResponse::new().add_event(event.add_attribute(
        events::attributes::PENDING_PACKET_FOUND,
        found.to_string(),
    ));
    let callback = IcaControllerCallbackMsg::OnAcknowledgementPacketCallback {
        ica_acknowledgement: ack,
        original_packet,
        relayer,
    };
    if let Some(forward) = callbacks::forward(deps.storage, callback)? {
        response = response.add_submessage(forward);
    }
    Ok(response)
}

/// Implements the IBC module's `OnTimeoutPacket` handler.
///
/// A timeout closes an ordered channel, so the channel the packet was sent
/// on is marked closed.
/// # Errors
/// Returns an error if storage access fails.
#[entry_point]
#[allow(clippy::needless_pass_by_value)]
pub fn ibc_packet_timeout(
    deps: DepsMut,
    _env: Env,
    msg: IbcPacketTimeoutMsg,
) -> Result<IbcBasicResponse, ContractError> {
    let IbcPacketTimeoutMsg {
        packet, relayer, ..
    } = msg;
    let channel_id = packet.src.channel_id.clone();
    let sequence = packet.sequence;

    update_counter(deps.storage, CallbackCounter::timeout)?;
    let found = take_pending(deps.storage, &channel_id, sequence);

    let mut response = IbcBasicResponse::new().add_event(
        events::packet_timeout(&channel_id, sequence)
            .add_attribute(events::attributes::PENDING_PACKET_FOUND, found.to_string()),
    );

    let mut state = CHANNEL_STATE.load(deps.storage)?;
    if state.channel_id == channel_id && state.channel_status.is_active() {
        state.close();
        CHANNEL_STATE.save(deps.storage, &state)?;
        response = response.add_event(events::channel_close(&channel_id));
    }

    let callback = IcaControllerCallbackMsg::OnTimeoutPacketCallback {
        original_packet: packet,
        relayer,
    };
    if let Some(forward) = callbacks::forward(deps.storage, callback)? {
        response = response.add_submessage(forward);
    }
    Ok(response)
}

/// Handles the `PacketReceive` for the IBC module.
///
/// Hosts never send packets to controllers; anything received is answered
/// with an error acknowledgement.
/// # Errors
/// Returns an error if the acknowledgement cannot be serialized.
#[entry_point]
#[allow(clippy::needless_pass_by_value)]
pub fn ibc_packet_receive(
    _deps: DepsMut,
    _env: Env,
    _msg: IbcPacketReceiveMsg,
) -> Result<IbcReceiveResponse, ContractError> {
    let ack = AcknowledgementData::Error("ica controller cannot receive packets".to_string());
    Ok(IbcReceiveResponse::new(to_json_binary(&ack)?))
}

fn update_counter(
    storage: &mut dyn Storage,
    record: fn(&mut CallbackCounter),
) -> Result<(), ContractError> {
    CALLBACK_COUNTER.update(storage, |mut counter| -> Result<_, ContractError> {
        record(&mut counter);
        Ok(counter)
    })?;
    Ok(())
}

/// Removes the pending record of a packet, returning whether it existed.
fn take_pending(storage: &mut dyn Storage, channel_id: &str, sequence: u64) -> bool {
    let key = (channel_id, sequence);
    let found = PENDING_PACKETS.has(storage, key);
    PENDING_PACKETS.remove(storage, key);
    found
}
