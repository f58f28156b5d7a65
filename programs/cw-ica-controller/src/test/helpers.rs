//! Test helpers for the interchain account controller

use cosmos_sdk_proto::cosmos::{
    base::v1beta1::Coin,
    gov::v1beta1::{MsgDeposit, MsgSubmitProposal},
};
use cosmwasm_std::{
    from_json,
    testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier, MockStorage},
    to_json_binary, Addr, CosmosMsg, Empty, Env, Event, IbcAcknowledgement, IbcBasicResponse,
    IbcChannel, IbcChannelConnectMsg, IbcChannelOpenMsg, IbcEndpoint, IbcMsg, IbcOrder,
    IbcPacket, IbcPacketAckMsg, IbcPacketTimeoutMsg, OwnedDeps, Response,
};
use ibc_proto::ibc::core::channel::v1::MsgChannelOpenInit;
use ica_packet::{registry::type_url, IcaMessage, TxEncoding};
use prost::Message;
use serde::de::DeserializeOwned;

use crate::{
    contract,
    ibc::{
        handshake::{ibc_channel_connect, ibc_channel_open},
        metadata::{IcaMetadata, HOST_PORT_ID},
        types::{AcknowledgementData, MSG_CHANNEL_OPEN_INIT_TYPE_URL},
    },
    msg::{
        ChannelOpenInitOptions, ExecuteMsg, InstantiateMsg, ProtoMessage, QueryMsg,
        SendPacketResponse,
    },
    state::controller_port_id,
};

/// The mocked dependencies used across the tests
pub type MockDeps = OwnedDeps<MockStorage, MockApi, MockQuerier, Empty>;

/// Controller side connection
pub const CONNECTION_ID: &str = "connection-0";
/// Host side connection
pub const COUNTERPARTY_CONNECTION_ID: &str = "connection-7";
/// The account address hosts report in the handshake
pub const ICA_ADDRESS: &str = "cosmos1fg8t9zx4rgvq3wqmqmvqryzkpg2g46f8hjvejz";

/// Mock dependencies for testing
#[must_use]
pub fn mk_deps() -> MockDeps {
    mock_dependencies()
}

/// Handshake options over the test connections
#[must_use]
pub fn channel_open_init_options(tx_encoding: Option<TxEncoding>) -> ChannelOpenInitOptions {
    ChannelOpenInitOptions {
        connection_id: CONNECTION_ID.to_string(),
        counterparty_connection_id: COUNTERPARTY_CONNECTION_ID.to_string(),
        counterparty_port_id: None,
        tx_encoding,
    }
}

/// Instantiates the controller owned by `owner` and starts the first handshake.
pub fn setup(
    deps: &mut MockDeps,
    owner: &Addr,
    callback: Option<&Addr>,
    tx_encoding: Option<TxEncoding>,
) -> Response {
    let msg = InstantiateMsg {
        owner: None,
        channel_open_init_options: Some(channel_open_init_options(tx_encoding)),
        send_callbacks_to: callback.map(ToString::to_string),
        default_timeout_seconds: None,
    };
    contract::instantiate(deps.as_mut(), mock_env(), message_info(owner, &[]), msg).unwrap()
}

/// Instantiates the controller and completes a handshake on `channel_id`.
pub fn setup_open_channel(deps: &mut MockDeps, owner: &Addr, channel_id: &str) {
    let response = setup(deps, owner, None, None);
    open_channel(deps, &response, channel_id, ICA_ADDRESS);
}

/// The version proposed by the `MsgChannelOpenInit` in `response`.
#[must_use]
pub fn proposed_version(response: &Response) -> String {
    let value = response
        .messages
        .iter()
        .find_map(|sub| match &sub.msg {
            CosmosMsg::Any(any) if any.type_url == MSG_CHANNEL_OPEN_INIT_TYPE_URL => {
                Some(any.value.clone())
            }
            _ => None,
        })
        .expect("no MsgChannelOpenInit in response");
    MsgChannelOpenInit::decode(value.as_slice())
        .unwrap()
        .channel
        .unwrap()
        .version
}

/// The host channel paired with `channel_id`.
#[must_use]
pub fn host_channel_id(channel_id: &str) -> String {
    format!("host-{channel_id}")
}

/// An ordered channel from the controller port to the host port.
#[must_use]
pub fn mock_channel(
    env: &Env,
    channel_id: &str,
    counterparty_channel_id: &str,
    version: &str,
) -> IbcChannel {
    IbcChannel::new(
        IbcEndpoint {
            port_id: controller_port_id(&env.contract.address),
            channel_id: channel_id.to_string(),
        },
        IbcEndpoint {
            port_id: HOST_PORT_ID.to_string(),
            channel_id: counterparty_channel_id.to_string(),
        },
        IbcOrder::Ordered,
        version,
        CONNECTION_ID,
    )
}

/// The version a host answers with: the proposal plus the account address.
#[must_use]
pub fn host_version(proposed: &str, ica_address: &str) -> String {
    IcaMetadata {
        address: ica_address.to_string(),
        ..IcaMetadata::from_version(proposed).unwrap()
    }
    .to_version()
    .unwrap()
}

/// Drives the handshake started by `response` to completion on `channel_id`.
pub fn open_channel(
    deps: &mut MockDeps,
    response: &Response,
    channel_id: &str,
    ica_address: &str,
) -> IbcBasicResponse {
    let env = mock_env();
    let channel = mock_channel(&env, channel_id, "", &proposed_version(response));
    let version = ibc_channel_open(deps.as_mut(), env.clone(), IbcChannelOpenMsg::new_init(channel))
        .unwrap()
        .unwrap()
        .version;

    let channel = mock_channel(&env, channel_id, &host_channel_id(channel_id), &version);
    ibc_channel_connect(
        deps.as_mut(),
        env,
        IbcChannelConnectMsg::new_ack(channel, host_version(&version, ica_address)),
    )
    .unwrap()
}

/// A governance proposal followed by a deposit on it.
#[must_use]
pub fn gov_proposal_and_deposit(proposer: &str) -> Vec<ProtoMessage> {
    let deposit = vec![Coin {
        denom: "stake".to_string(),
        amount: "10000000".to_string(),
    }];
    let proposal = MsgSubmitProposal {
        content: None,
        initial_deposit: deposit.clone(),
        proposer: proposer.to_string(),
    };
    let top_up = MsgDeposit {
        proposal_id: 1,
        depositor: proposer.to_string(),
        amount: deposit,
    };

    [
        IcaMessage::encode(type_url::MSG_SUBMIT_PROPOSAL, &proposal),
        IcaMessage::encode(type_url::MSG_DEPOSIT, &top_up),
    ]
    .into_iter()
    .map(|msg| ProtoMessage {
        type_url: msg.type_url,
        value: msg.value.into(),
    })
    .collect()
}

/// Sends `messages` as `sender` with the default memo and timeout.
pub fn send_messages(
    deps: &mut MockDeps,
    sender: &Addr,
    messages: Vec<ProtoMessage>,
) -> Result<Response, crate::ContractError> {
    contract::execute(
        deps.as_mut(),
        mock_env(),
        message_info(sender, &[]),
        ExecuteMsg::SendMessages {
            messages,
            packet_memo: None,
            timeout_seconds: None,
        },
    )
}

/// The packet a send response emitted, as the host would see it.
#[must_use]
pub fn sent_packet(env: &Env, response: &Response) -> IbcPacket {
    let CosmosMsg::Ibc(IbcMsg::SendPacket {
        channel_id,
        data,
        timeout,
        ..
    }) = &response.messages[0].msg
    else {
        panic!("expected a SendPacket message");
    };
    let SendPacketResponse { sequence } = from_json(response.data.as_ref().unwrap()).unwrap();

    IbcPacket::new(
        data.clone(),
        IbcEndpoint {
            port_id: controller_port_id(&env.contract.address),
            channel_id: channel_id.clone(),
        },
        IbcEndpoint {
            port_id: HOST_PORT_ID.to_string(),
            channel_id: host_channel_id(channel_id),
        },
        sequence,
        timeout.clone(),
    )
}

/// The relayer delivering acknowledgements and timeouts
#[must_use]
pub fn relayer() -> Addr {
    MockApi::default().addr_make("relayer")
}

/// An acknowledgement of `packet` carrying `ack`.
#[must_use]
pub fn ack_msg(packet: IbcPacket, ack: &AcknowledgementData) -> IbcPacketAckMsg {
    IbcPacketAckMsg::new(
        IbcAcknowledgement::new(to_json_binary(ack).unwrap()),
        packet,
        relayer(),
    )
}

/// A timeout of `packet`.
#[must_use]
pub fn timeout_msg(packet: IbcPacket) -> IbcPacketTimeoutMsg {
    IbcPacketTimeoutMsg::new(packet, relayer())
}

/// Runs `msg` against the contract and deserializes the answer.
#[must_use]
pub fn query_as<T: DeserializeOwned>(deps: &MockDeps, msg: QueryMsg) -> T {
    from_json(contract::query(deps.as_ref(), mock_env(), msg).unwrap()).unwrap()
}

/// The value of `key` on the first event of type `ty`.
#[must_use]
pub fn event_attribute(events: &[Event], ty: &str, key: &str) -> Option<String> {
    events
        .iter()
        .find(|event| event.ty == ty)?
        .attributes
        .iter()
        .find(|attr| attr.key == key)
        .map(|attr| attr.value.clone())
}
