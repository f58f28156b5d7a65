//! This module contains the entry points for the channel handshake:
//! - Channel open, only `OpenInit` is accepted.
//! - Channel connect, only `OpenAck` is accepted.
//! - Channel close.
//!
//! Callbacks naming a channel other than the tracked one are ignored.

use cosmwasm_std::{
    ensure, entry_point, Api, DepsMut, Env, Ibc3ChannelOpenResponse, IbcBasicResponse,
    IbcChannel, IbcChannelCloseMsg, IbcChannelConnectMsg, IbcChannelOpenMsg,
    IbcChannelOpenResponse, IbcOrder, Storage,
};

use crate::{
    callbacks::{self, IcaControllerCallbackMsg},
    events,
    ibc::metadata::{IcaMetadata, HOST_PORT_ID},
    state::{
        ChannelState, ChannelStatus, IcaInfo, ALLOW_CHANNEL_OPEN_INIT, CHANNEL_OPEN_INIT_OPTIONS,
        CHANNEL_STATE, ICA_INFO,
    },
    ContractError,
};

/// Implements the IBC module's `OnChanOpenInit` and `OnChanOpenTry`
/// handlers.
/// # Errors
/// Returns an error for `OpenTry`, and for an `OpenInit` that was not
/// requested through `create_channel` or does not describe an ICS-27
/// controller channel.
#[entry_point]
#[allow(clippy::needless_pass_by_value)]
pub fn ibc_channel_open(
    deps: DepsMut,
    _env: Env,
    msg: IbcChannelOpenMsg,
) -> Result<IbcChannelOpenResponse, ContractError> {
    match msg {
        IbcChannelOpenMsg::OpenInit { channel } => open_init(deps.storage, &channel),
        IbcChannelOpenMsg::OpenTry { .. } => Err(ContractError::InvalidHandshakeInitiator),
    }
}

/// Implements the IBC module's `OnChanOpenAck` and `OnChanOpenConfirm`
/// handlers.
/// # Errors
/// Returns an error for `OpenConfirm`, and for an `OpenAck` whose
/// counterparty metadata does not match the proposal.
#[entry_point]
#[allow(clippy::needless_pass_by_value)]
pub fn ibc_channel_connect(
    deps: DepsMut,
    _env: Env,
    msg: IbcChannelConnectMsg,
) -> Result<IbcBasicResponse, ContractError> {
    match msg {
        IbcChannelConnectMsg::OpenAck {
            channel,
            counterparty_version,
        } => open_ack(deps, channel, &counterparty_version),
        IbcChannelConnectMsg::OpenConfirm { .. } => Err(ContractError::InvalidHandshakeInitiator),
    }
}

/// Implements the IBC module's `OnChanCloseInit` and `OnChanCloseConfirm`
/// handlers.
/// # Errors
/// Returns an error if the channel state cannot be accessed.
#[entry_point]
#[allow(clippy::needless_pass_by_value)]
pub fn ibc_channel_close(
    deps: DepsMut,
    _env: Env,
    msg: IbcChannelCloseMsg,
) -> Result<IbcBasicResponse, ContractError> {
    let channel = msg.channel();
    let mut state = CHANNEL_STATE.load(deps.storage)?;

    if let Err(err) = state.check_channel(&channel.endpoint.channel_id, None) {
        return Ok(ignore(deps.api, "close", &channel.endpoint.channel_id, &err));
    }

    state.close();
    CHANNEL_STATE.save(deps.storage, &state)?;

    Ok(IbcBasicResponse::new().add_event(events::channel_close(&state.channel_id)))
}

fn open_init(
    storage: &mut dyn Storage,
    channel: &IbcChannel,
) -> Result<IbcChannelOpenResponse, ContractError> {
    let allowed = ALLOW_CHANNEL_OPEN_INIT.may_load(storage)?.unwrap_or(false);
    ensure!(allowed, ContractError::ChannelOpenInitNotAllowed);
    ALLOW_CHANNEL_OPEN_INIT.save(storage, &false)?;

    if let Some(current) = CHANNEL_STATE.may_load(storage)? {
        ensure!(
            !current.channel_status.is_active(),
            ContractError::ChannelAlreadyActive {
                status: current.channel_status
            }
        );
    }

    ensure!(
        channel.order == IbcOrder::Ordered,
        ContractError::InvalidChannelOrdering
    );
    ensure!(
        channel.counterparty_endpoint.port_id == HOST_PORT_ID,
        ContractError::InvalidHostPort {
            expected: HOST_PORT_ID.to_string(),
            actual: channel.counterparty_endpoint.port_id.clone(),
        }
    );

    // relayer initiated handshakes may leave the version empty
    let metadata = if channel.version.is_empty() {
        let options = CHANNEL_OPEN_INIT_OPTIONS
            .may_load(storage)?
            .ok_or(ContractError::NoChannelOpenInitOptions)?;
        let encoding = match options.tx_encoding {
            Some(encoding) => encoding,
            None => ICA_INFO
                .may_load(storage)?
                .map(|info| info.encoding)
                .unwrap_or_default(),
        };
        IcaMetadata::new(
            channel.connection_id.clone(),
            options.counterparty_connection_id,
            encoding,
        )
    } else {
        IcaMetadata::from_version(&channel.version)?
    };
    metadata.validate(channel)?;

    let version = metadata.to_version()?;
    CHANNEL_STATE.save(storage, &ChannelState::init(channel, version.clone()))?;

    Ok(Some(Ibc3ChannelOpenResponse { version }))
}

fn open_ack(
    deps: DepsMut,
    channel: IbcChannel,
    counterparty_version: &str,
) -> Result<IbcBasicResponse, ContractError> {
    let mut state = CHANNEL_STATE.load(deps.storage)?;
    if let Err(err) = state.check_channel(&channel.endpoint.channel_id, Some(ChannelStatus::Init)) {
        return Ok(ignore(deps.api, "open_ack", &channel.endpoint.channel_id, &err));
    }

    let metadata = IcaMetadata::from_version(&state.version)?;
    let counterparty = IcaMetadata::from_version(counterparty_version)?;
    metadata.validate_counterparty(&counterparty)?;

    state.open(
        channel.counterparty_endpoint.channel_id.clone(),
        counterparty_version.to_string(),
    );
    CHANNEL_STATE.save(deps.storage, &state)?;

    let ica_info = IcaInfo {
        ica_address: counterparty.address,
        channel_id: state.channel_id,
        encoding: counterparty.encoding,
    };
    let previous = ICA_INFO.may_load(deps.storage)?;
    ICA_INFO.save(deps.storage, &ica_info)?;

    let mut event = events::channel_open_ack(&ica_info);
    if let Some(previous) = previous.filter(|prev| prev.ica_address != ica_info.ica_address) {
        deps.api.debug(&format!(
            "interchain account changed on re-open: {} -> {}",
            previous.ica_address, ica_info.ica_address
        ));
        event = event.add_attribute(
            events::attributes::PREVIOUS_ICA_ADDRESS,
            previous.ica_address,
        );
    }

    let mut response = IbcBasicResponse::new().add_event(event);
    let callback = IcaControllerCallbackMsg::OnChannelOpenAckCallback {
        channel,
        ica_address: ica_info.ica_address,
        tx_encoding: ica_info.encoding,
    };
    if let Some(forward) = callbacks::forward(deps.storage, callback)? {
        response = response.add_submessage(forward);
    }
    Ok(response)
}

fn ignore(api: &dyn Api, step: &str, channel_id: &str, err: &ContractError) -> IbcBasicResponse {
    api.debug(&format!("ignoring {step} callback: {err}"));
    IbcBasicResponse::new().add_event(events::handshake_mismatch(
        step,
        channel_id,
        &err.to_string(),
    ))
}

impl ChannelState {
    /// Checks that a handshake callback is about this channel and, if
    /// `status` is given, that the channel is in it.
    /// # Errors
    /// Returns [`ContractError::HandshakeMismatch`] otherwise.
    pub fn check_channel(
        &self,
        channel_id: &str,
        status: Option<ChannelStatus>,
    ) -> Result<(), ContractError> {
        let status_matches = status.map_or(true, |status| status == self.channel_status);
        if self.channel_id == channel_id && status_matches {
            Ok(())
        } else {
            Err(ContractError::HandshakeMismatch {
                channel_id: channel_id.to_string(),
                tracked_channel_id: self.channel_id.clone(),
                status: self.channel_status,
            })
        }
    }
}
