//! This module contains the execute handlers: channel creation and packet
//! dispatch.

use cosmwasm_std::{
    ensure, to_json_binary, Binary, CosmosMsg, DepsMut, Env, Event, IbcMsg, IbcTimeout,
    MessageInfo, Response, Storage, Timestamp,
};
use ica_packet::{IcaMessage, IcaPacketData, TypeRegistry};

use crate::{
    cosmos_msg, events,
    ibc::{
        metadata::{IcaMetadata, HOST_PORT_ID},
        types::channel_open_init_msg,
    },
    msg::{ChannelOpenInitOptions, ProtoMessage, SendPacketResponse},
    ownership::assert_owner,
    state::{
        controller_port_id, ChannelState, IcaInfo, PendingPacket, ALLOW_CHANNEL_OPEN_INIT,
        CALLBACK_ADDRESS, CHANNEL_OPEN_INIT_OPTIONS, CHANNEL_STATE, CONFIG, ICA_INFO,
        PENDING_PACKETS,
    },
    ContractError,
};

/// Starts a new channel handshake.
/// # Errors
/// Returns an error if the caller is not the owner, a channel is open or
/// opening, or no options are available.
pub fn create_channel(
    deps: DepsMut,
    env: &Env,
    info: &MessageInfo,
    options: Option<ChannelOpenInitOptions>,
) -> Result<Response, ContractError> {
    assert_owner(deps.storage, &info.sender)?;

    let status = CHANNEL_STATE.load(deps.storage)?.channel_status;
    ensure!(
        !status.is_active(),
        ContractError::ChannelAlreadyActive { status }
    );

    let options = match options {
        Some(options) => options,
        None => CHANNEL_OPEN_INIT_OPTIONS
            .may_load(deps.storage)?
            .ok_or(ContractError::NoChannelOpenInitOptions)?,
    };

    let (msg, event) = prepare_channel_open_init(deps.storage, env, options)?;
    Ok(Response::new()
        .add_message(msg)
        .add_event(event)
        .add_attribute("action", "create_channel"))
}

/// Stores `options`, opens the channel open init gate and builds the
/// `MsgChannelOpenInit`.
///
/// Without an explicit encoding, the encoding of the existing interchain
/// account is kept.
/// # Errors
/// Returns an error if storage access fails.
pub fn prepare_channel_open_init(
    storage: &mut dyn Storage,
    env: &Env,
    options: ChannelOpenInitOptions,
) -> Result<(CosmosMsg, Event), ContractError> {
    let encoding = match options.tx_encoding {
        Some(encoding) => encoding,
        None => ICA_INFO
            .may_load(storage)?
            .map(|info| info.encoding)
            .unwrap_or_default(),
    };
    let counterparty_port_id = options
        .counterparty_port_id
        .clone()
        .unwrap_or_else(|| HOST_PORT_ID.to_string());
    let version = IcaMetadata::new(
        options.connection_id.clone(),
        options.counterparty_connection_id.clone(),
        encoding,
    )
    .to_version()?;

    CHANNEL_OPEN_INIT_OPTIONS.save(storage, &options)?;
    ALLOW_CHANNEL_OPEN_INIT.save(storage, &true)?;

    let event = events::channel_open_init(&options.connection_id, &counterparty_port_id);
    let msg = channel_open_init_msg(
        env.contract.address.to_string(),
        controller_port_id(&env.contract.address),
        options.connection_id,
        counterparty_port_id,
        version,
    );
    Ok((msg, event))
}

/// Sends type URL tagged messages through the packet codec.
/// # Errors
/// Returns an error if the caller is not the owner, the channel is not open,
/// or the batch cannot be encoded.
pub fn send_messages(
    deps: DepsMut,
    env: &Env,
    info: &MessageInfo,
    messages: Vec<ProtoMessage>,
    packet_memo: Option<String>,
    timeout_seconds: Option<u64>,
) -> Result<Response, ContractError> {
    assert_owner(deps.storage, &info.sender)?;
    let (channel, ica_info) = load_open_channel(deps.storage)?;

    let messages = messages.into_iter().map(IcaMessage::from).collect();
    encode_and_send(
        deps.storage,
        env,
        channel,
        &ica_info,
        messages,
        packet_memo,
        timeout_seconds,
    )
}

/// Sends `CosmosMsg`s, signed by the interchain account, through the packet
/// codec.
/// # Errors
/// Returns an error if the caller is not the owner, the channel is not open,
/// a message has no interchain account representation, or the batch cannot
/// be encoded.
pub fn send_cosmos_msgs(
    deps: DepsMut,
    env: &Env,
    info: &MessageInfo,
    messages: Vec<CosmosMsg>,
    packet_memo: Option<String>,
    timeout_seconds: Option<u64>,
) -> Result<Response, ContractError> {
    assert_owner(deps.storage, &info.sender)?;
    let (channel, ica_info) = load_open_channel(deps.storage)?;

    let messages = messages
        .into_iter()
        .map(|msg| cosmos_msg::to_ica_message(msg, &ica_info.ica_address))
        .collect::<Result<Vec<_>, _>>()?;
    encode_and_send(
        deps.storage,
        env,
        channel,
        &ica_info,
        messages,
        packet_memo,
        timeout_seconds,
    )
}

/// Sends an already encoded `CosmosTx`, bypassing the type registry.
/// # Errors
/// Returns an error if the caller is not the owner, the channel is not open,
/// or the body is empty or the memo too long.
pub fn send_custom_ica_messages(
    deps: DepsMut,
    env: &Env,
    info: &MessageInfo,
    messages: Binary,
    packet_memo: Option<String>,
    timeout_seconds: Option<u64>,
) -> Result<Response, ContractError> {
    assert_owner(deps.storage, &info.sender)?;
    let (channel, _) = load_open_channel(deps.storage)?;

    let packet = IcaPacketData::from_raw(messages.into(), packet_memo)?;
    send_packet(deps.storage, env, channel, &packet, vec![], timeout_seconds)
}

/// Sets or clears the callback contract.
/// # Errors
/// Returns an error if the caller is not the owner or the address is invalid.
pub fn update_callback_address(
    deps: DepsMut,
    info: &MessageInfo,
    callback_address: Option<String>,
) -> Result<Response, ContractError> {
    assert_owner(deps.storage, &info.sender)?;

    let callback_address = callback_address
        .map(|addr| deps.api.addr_validate(&addr))
        .transpose()?;
    CALLBACK_ADDRESS.save(deps.storage, &callback_address)?;

    Ok(Response::new()
        .add_attribute("action", "update_callback_address")
        .add_attribute(
            "callback_address",
            callback_address.map_or_else(String::new, String::from),
        ))
}

/// The current channel and interchain account, if the channel is open.
fn load_open_channel(storage: &dyn Storage) -> Result<(ChannelState, IcaInfo), ContractError> {
    let channel = CHANNEL_STATE.load(storage)?;
    ensure!(
        channel.is_open(),
        ContractError::ChannelNotOpen {
            status: channel.channel_status
        }
    );
    let ica_info = ICA_INFO
        .may_load(storage)?
        .ok_or(ContractError::IcaInfoNotFound)?;
    Ok((channel, ica_info))
}

fn encode_and_send(
    storage: &mut dyn Storage,
    env: &Env,
    channel: ChannelState,
    ica_info: &IcaInfo,
    messages: Vec<IcaMessage>,
    packet_memo: Option<String>,
    timeout_seconds: Option<u64>,
) -> Result<Response, ContractError> {
    let type_urls = messages.iter().map(|msg| msg.type_url.clone()).collect();
    let packet = IcaPacketData::from_messages(
        &TypeRegistry::default(),
        ica_info.encoding,
        messages,
        packet_memo,
    )?;
    send_packet(storage, env, channel, &packet, type_urls, timeout_seconds)
}

/// Allocates a sequence, records the pending packet and emits the send.
fn send_packet(
    storage: &mut dyn Storage,
    env: &Env,
    mut channel: ChannelState,
    packet: &IcaPacketData,
    type_urls: Vec<String>,
    timeout_seconds: Option<u64>,
) -> Result<Response, ContractError> {
    let timeout_seconds = match timeout_seconds {
        Some(timeout_seconds) => timeout_seconds,
        None => CONFIG.load(storage)?.default_timeout_seconds,
    };
    let timeout_timestamp = timeout_timestamp(env.block.time, timeout_seconds)?;
    let data = Binary::from(packet.to_vec()?);

    let sequence = channel.next_sequence();
    CHANNEL_STATE.save(storage, &channel)?;

    let event = events::packet_sent(
        &channel.channel_id,
        sequence,
        type_urls.len(),
        timeout_timestamp,
    );
    PENDING_PACKETS.save(
        storage,
        (channel.channel_id.as_str(), sequence),
        &PendingPacket {
            channel_id: channel.channel_id.clone(),
            sequence,
            type_urls,
            memo: packet.memo.clone(),
            timeout_timestamp,
        },
    )?;

    let send = IbcMsg::SendPacket {
        channel_id: channel.channel_id,
        data,
        timeout: IbcTimeout::with_timestamp(timeout_timestamp),
    };

    Ok(Response::new()
        .add_message(send)
        .add_event(event)
        .add_attribute("action", "send_packet")
        .set_data(to_json_binary(&SendPacketResponse { sequence })?))
}

/// The time `timeout_seconds` after `now`.
/// # Errors
/// Returns [`ContractError::InvalidTimeout`] if `timeout_seconds` is zero or
/// the timestamp does not fit in nanoseconds since the epoch.
pub fn timeout_timestamp(
    now: Timestamp,
    timeout_seconds: u64,
) -> Result<Timestamp, ContractError> {
    ensure!(timeout_seconds > 0, ContractError::InvalidTimeout);
    timeout_seconds
        .checked_mul(1_000_000_000)
        .and_then(|nanos| now.nanos().checked_add(nanos))
        .map(Timestamp::from_nanos)
        .ok_or(ContractError::InvalidTimeout)
}

#[cfg(test)]
mod tests {
    use cosmwasm_std::Timestamp;
    use rstest::rstest;

    use super::timeout_timestamp;
    use crate::ContractError;

    #[rstest]
    #[case::zero(0)]
    #[case::seconds_overflow(u64::MAX)]
    #[case::nanos_overflow(u64::MAX / 1_000_000_000)]
    fn test_timeout_timestamp_rejects(#[case] timeout_seconds: u64) {
        let now = Timestamp::from_seconds(1_700_000_000);
        let err = timeout_timestamp(now, timeout_seconds).unwrap_err();
        assert!(matches!(err, ContractError::InvalidTimeout));
    }

    #[test]
    fn test_timeout_timestamp() {
        let now = Timestamp::from_seconds(1_700_000_000);
        assert_eq!(now.plus_seconds(600), timeout_timestamp(now, 600).unwrap());
    }
}
