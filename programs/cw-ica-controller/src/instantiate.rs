//! This module contains the instantiate helper functions

use cosmwasm_std::{DepsMut, Env, MessageInfo, Response};

use crate::{
    execute::{prepare_channel_open_init, timeout_timestamp},
    msg::InstantiateMsg,
    state::{
        controller_port_id, CallbackCounter, ChannelState, ContractConfig, Ownership,
        ALLOW_CHANNEL_OPEN_INIT, CALLBACK_ADDRESS, CALLBACK_COUNTER, CHANNEL_STATE, CONFIG,
        DEFAULT_TIMEOUT_SECONDS, OWNERSHIP,
    },
    ContractError,
};

/// Initializes ownership, configuration, the counters and an uninitialized
/// channel, and starts the first handshake if options are given.
/// # Errors
/// Returns an error if an address is invalid or the default timeout is zero
/// or out of range.
pub fn controller(
    deps: DepsMut,
    env: &Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    let owner = match msg.owner {
        Some(owner) => deps.api.addr_validate(&owner)?,
        None => info.sender,
    };
    let callback_address = msg
        .send_callbacks_to
        .map(|addr| deps.api.addr_validate(&addr))
        .transpose()?;
    let default_timeout_seconds = msg
        .default_timeout_seconds
        .unwrap_or(DEFAULT_TIMEOUT_SECONDS);
    timeout_timestamp(env.block.time, default_timeout_seconds)?;

    OWNERSHIP.save(deps.storage, &Ownership::new(owner.clone()))?;
    CONFIG.save(
        deps.storage,
        &ContractConfig {
            default_timeout_seconds,
        },
    )?;
    CALLBACK_ADDRESS.save(deps.storage, &callback_address)?;
    CALLBACK_COUNTER.save(deps.storage, &CallbackCounter::default())?;
    CHANNEL_STATE.save(
        deps.storage,
        &ChannelState::uninitialized(controller_port_id(&env.contract.address)),
    )?;
    ALLOW_CHANNEL_OPEN_INIT.save(deps.storage, &false)?;

    let mut response = Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("owner", owner);

    if let Some(options) = msg.channel_open_init_options {
        let (open_init, event) = prepare_channel_open_init(deps.storage, env, options)?;
        response = response.add_message(open_init).add_event(event);
    }

    Ok(response)
}
