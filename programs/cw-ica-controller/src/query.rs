//! This module contains the query handlers. Queries are not authenticated.

use cosmwasm_std::{to_json_binary, Binary, Deps};

use crate::{
    msg::ContractStateResponse,
    state::{
        ALLOW_CHANNEL_OPEN_INIT, CALLBACK_ADDRESS, CALLBACK_COUNTER, CHANNEL_OPEN_INIT_OPTIONS,
        CHANNEL_STATE, CONFIG, ICA_INFO, OWNERSHIP, PENDING_PACKETS,
    },
    ContractError,
};

/// The current channel.
/// # Errors
/// Returns an error if the channel state cannot be loaded.
pub fn channel(deps: Deps) -> Result<Binary, ContractError> {
    Ok(to_json_binary(&CHANNEL_STATE.load(deps.storage)?)?)
}

/// The interchain account and configuration.
/// # Errors
/// Returns an error if the state cannot be loaded.
pub fn contract_state(deps: Deps) -> Result<Binary, ContractError> {
    let response = ContractStateResponse {
        ica_info: ICA_INFO.may_load(deps.storage)?,
        callback_address: CALLBACK_ADDRESS.may_load(deps.storage)?.flatten(),
        allow_channel_open_init: ALLOW_CHANNEL_OPEN_INIT
            .may_load(deps.storage)?
            .unwrap_or(false),
        channel_open_init_options: CHANNEL_OPEN_INIT_OPTIONS.may_load(deps.storage)?,
        default_timeout_seconds: CONFIG.load(deps.storage)?.default_timeout_seconds,
    };
    Ok(to_json_binary(&response)?)
}

/// The packet outcome counters.
/// # Errors
/// Returns an error if the counters cannot be loaded.
pub fn callback_counter(deps: Deps) -> Result<Binary, ContractError> {
    Ok(to_json_binary(&CALLBACK_COUNTER.load(deps.storage)?)?)
}

/// The owner and pending owner.
/// # Errors
/// Returns an error if the ownership cannot be loaded.
pub fn ownership(deps: Deps) -> Result<Binary, ContractError> {
    Ok(to_json_binary(&OWNERSHIP.load(deps.storage)?)?)
}

/// A pending packet, `null` once acknowledged or timed out.
/// # Errors
/// Returns an error if the record cannot be loaded.
pub fn pending_packet(deps: Deps, channel_id: &str, sequence: u64) -> Result<Binary, ContractError> {
    Ok(to_json_binary(
        &PENDING_PACKETS.may_load(deps.storage, (channel_id, sequence))?,
    )?)
}
