//! This module contains the `CosmWasm` entrypoints for the interchain account controller

use cosmwasm_std::{
    ensure, entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response,
};

use crate::callbacks::{self, FORWARD_CALLBACK_REPLY_ID};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::{execute, instantiate, ownership, query, ContractError};

/// The version of the contracts state.
/// It is used to determine if the state needs to be migrated in the migrate entry point.
const STATE_VERSION: &str = env!("CARGO_PKG_VERSION");
const CONTRACT_NAME: &str = env!("CARGO_PKG_NAME");

/// The instantiate entry point for the CosmWasm contract.
/// # Errors
/// Will return an error if an address is invalid or the default timeout is zero.
#[entry_point]
#[allow(clippy::needless_pass_by_value)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    cw2::set_contract_version(deps.storage, CONTRACT_NAME, STATE_VERSION)?;

    instantiate::controller(deps, &env, info, msg)
}

/// The execute entry point for the CosmWasm contract.
/// It routes the message to the appropriate handler.
/// # Errors
/// Will return an error if the handler returns an error.
#[entry_point]
#[allow(clippy::needless_pass_by_value)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::CreateChannel {
            channel_open_init_options,
        } => execute::create_channel(deps, &env, &info, channel_open_init_options),
        ExecuteMsg::SendMessages {
            messages,
            packet_memo,
            timeout_seconds,
        } => execute::send_messages(deps, &env, &info, messages, packet_memo, timeout_seconds),
        ExecuteMsg::SendCosmosMsgs {
            messages,
            packet_memo,
            timeout_seconds,
        } => execute::send_cosmos_msgs(deps, &env, &info, messages, packet_memo, timeout_seconds),
        ExecuteMsg::SendCustomIcaMessages {
            messages,
            packet_memo,
            timeout_seconds,
        } => execute::send_custom_ica_messages(
            deps,
            &env,
            &info,
            messages,
            packet_memo,
            timeout_seconds,
        ),
        ExecuteMsg::UpdateCallbackAddress { callback_address } => {
            execute::update_callback_address(deps, &info, callback_address)
        }
        ExecuteMsg::UpdateOwnership(action) => ownership::update_ownership(deps, &info, action),
    }
}

/// The query entry point for the CosmWasm contract.
/// It routes the message to the appropriate handler.
/// # Errors
/// Will return an error if the handler returns an error.
#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::GetChannel {} => query::channel(deps),
        QueryMsg::GetContractState {} => query::contract_state(deps),
        QueryMsg::GetCallbackCounter {} => query::callback_counter(deps),
        QueryMsg::Ownership {} => query::ownership(deps),
        QueryMsg::GetPendingPacket {
            channel_id,
            sequence,
        } => query::pending_packet(deps, &channel_id, sequence),
    }
}

/// The reply entry point for the CosmWasm contract.
/// Only failed callback forwards reply, and they never fail the transaction.
/// # Errors
/// Will return an error for replies this contract did not request.
#[entry_point]
#[allow(clippy::needless_pass_by_value)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        FORWARD_CALLBACK_REPLY_ID => Ok(callbacks::on_forward_reply(deps.api, &msg.result)),
        id => Err(ContractError::UnknownReplyId(id)),
    }
}

/// The migrate entry point for the CosmWasm contract.
/// # Errors
/// Will return an error if the stored contract is not this contract.
#[entry_point]
#[allow(clippy::needless_pass_by_value)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let previous = cw2::get_contract_version(deps.storage)?;
    ensure!(
        previous.contract == CONTRACT_NAME,
        ContractError::InvalidMigrationName {
            expected: CONTRACT_NAME.to_string(),
            actual: previous.contract,
        }
    );

    cw2::set_contract_version(deps.storage, CONTRACT_NAME, STATE_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", previous.version)
        .add_attribute("to_version", STATE_VERSION))
}
