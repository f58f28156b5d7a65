//! Conversion of `CosmosMsg`s into messages signed by the interchain account.

use cosmos_sdk_proto::{
    cosmos::{
        bank::v1beta1::MsgSend,
        base::v1beta1::Coin as ProtoCoin,
        distribution::v1beta1::{
            MsgFundCommunityPool, MsgSetWithdrawAddress, MsgWithdrawDelegatorReward,
        },
        gov::v1beta1::{MsgVote, VoteOption as ProtoVoteOption},
        staking::v1beta1::{MsgBeginRedelegate, MsgDelegate, MsgUndelegate},
    },
    cosmwasm::wasm::v1::{MsgExecuteContract, MsgInstantiateContract},
};
use cosmwasm_std::{
    BankMsg, Coin, CosmosMsg, DistributionMsg, GovMsg, IbcMsg, StakingMsg, VoteOption, WasmMsg,
};
use ibc_proto::{
    cosmos::base::v1beta1::Coin as IbcProtoCoin,
    ibc::{applications::transfer::v1::MsgTransfer, core::client::v1::Height},
};
use ica_packet::{registry::type_url, IcaMessage};

use crate::ContractError;

/// The port of the ICS-20 transfer module.
const TRANSFER_PORT_ID: &str = "transfer";

/// Converts `msg` into a message executed by the interchain account
/// `ica_address`.
/// # Errors
/// Returns [`ContractError::UnsupportedCosmosMsg`] for messages that have no
/// host chain representation.
pub fn to_ica_message(msg: CosmosMsg, ica_address: &str) -> Result<IcaMessage, ContractError> {
    let sender = ica_address.to_string();

    let ica_msg = match msg {
        CosmosMsg::Bank(BankMsg::Send { to_address, amount }) => IcaMessage::encode(
            type_url::MSG_SEND,
            &MsgSend {
                from_address: sender,
                to_address,
                amount: amount.into_iter().map(proto_coin).collect(),
            },
        ),
        CosmosMsg::Staking(StakingMsg::Delegate { validator, amount }) => IcaMessage::encode(
            type_url::MSG_DELEGATE,
            &MsgDelegate {
                delegator_address: sender,
                validator_address: validator,
                amount: Some(proto_coin(amount)),
            },
        ),
        CosmosMsg::Staking(StakingMsg::Undelegate { validator, amount }) => IcaMessage::encode(
            type_url::MSG_UNDELEGATE,
            &MsgUndelegate {
                delegator_address: sender,
                validator_address: validator,
                amount: Some(proto_coin(amount)),
            },
        ),
        CosmosMsg::Staking(StakingMsg::Redelegate {
            src_validator,
            dst_validator,
            amount,
        }) => IcaMessage::encode(
            type_url::MSG_BEGIN_REDELEGATE,
            &MsgBeginRedelegate {
                delegator_address: sender,
                validator_src_address: src_validator,
                validator_dst_address: dst_validator,
                amount: Some(proto_coin(amount)),
            },
        ),
        CosmosMsg::Distribution(DistributionMsg::WithdrawDelegatorReward { validator }) => {
            IcaMessage::encode(
                type_url::MSG_WITHDRAW_DELEGATOR_REWARD,
                &MsgWithdrawDelegatorReward {
                    delegator_address: sender,
                    validator_address: validator,
                },
            )
        }
        CosmosMsg::Distribution(DistributionMsg::SetWithdrawAddress { address }) => {
            IcaMessage::encode(
                type_url::MSG_SET_WITHDRAW_ADDRESS,
                &MsgSetWithdrawAddress {
                    delegator_address: sender,
                    withdraw_address: address,
                },
            )
        }
        CosmosMsg::Distribution(DistributionMsg::FundCommunityPool { amount }) => {
            IcaMessage::encode(
                type_url::MSG_FUND_COMMUNITY_POOL,
                &MsgFundCommunityPool {
                    amount: amount.into_iter().map(proto_coin).collect(),
                    depositor: sender,
                },
            )
        }
        CosmosMsg::Gov(GovMsg::Vote { proposal_id, option }) => IcaMessage::encode(
            type_url::MSG_VOTE,
            &MsgVote {
                proposal_id,
                voter: sender,
                option: proto_vote_option(&option).into(),
            },
        ),
        CosmosMsg::Ibc(IbcMsg::Transfer {
            channel_id,
            to_address,
            amount,
            timeout,
            memo,
        }) => IcaMessage::encode(
            type_url::MSG_TRANSFER,
            &MsgTransfer {
                source_port: TRANSFER_PORT_ID.to_string(),
                source_channel: channel_id,
                token: Some(IbcProtoCoin {
                    denom: amount.denom,
                    amount: amount.amount.to_string(),
                }),
                sender,
                receiver: to_address,
                timeout_height: timeout.block().map(|block| Height {
                    revision_number: block.revision,
                    revision_height: block.height,
                }),
                timeout_timestamp: timeout.timestamp().map_or(0, |ts| ts.nanos()),
                memo: memo.unwrap_or_default(),
                ..Default::default()
            },
        ),
        CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr,
            msg,
            funds,
        }) => IcaMessage::encode(
            type_url::MSG_EXECUTE_CONTRACT,
            &MsgExecuteContract {
                sender,
                contract: contract_addr,
                msg: msg.to_vec(),
                funds: funds.into_iter().map(proto_coin).collect(),
            },
        ),
        CosmosMsg::Wasm(WasmMsg::Instantiate {
            admin,
            code_id,
            msg,
            funds,
            label,
        }) => IcaMessage::encode(
            type_url::MSG_INSTANTIATE_CONTRACT,
            &MsgInstantiateContract {
                sender,
                admin: admin.unwrap_or_default(),
                code_id,
                label,
                msg: msg.to_vec(),
                funds: funds.into_iter().map(proto_coin).collect(),
            },
        ),
        CosmosMsg::Any(any) => IcaMessage::new(any.type_url, any.value),
        other => return Err(ContractError::UnsupportedCosmosMsg(format!("{other:?}"))),
    };

    Ok(ica_msg)
}

fn proto_coin(coin: Coin) -> ProtoCoin {
    ProtoCoin {
        denom: coin.denom,
        amount: coin.amount.to_string(),
    }
}

const fn proto_vote_option(option: &VoteOption) -> ProtoVoteOption {
    match option {
        VoteOption::Yes => ProtoVoteOption::Yes,
        VoteOption::No => ProtoVoteOption::No,
        VoteOption::Abstain => ProtoVoteOption::Abstain,
        VoteOption::NoWithVeto => ProtoVoteOption::NoWithVeto,
    }
}
