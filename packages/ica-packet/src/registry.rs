//! Registry of the message types a controller is willing to encode.
//!
//! Every message placed in a packet must carry a type URL that resolves in the
//! registry, and its bytes must decode as the registered type. Resolution is
//! static: the registry is filled once when it is built and is never guessed
//! at for an unknown URL.

use std::{collections::BTreeMap, fmt};

use cosmos_sdk_proto::{
    cosmos::{
        bank::v1beta1::MsgSend,
        distribution::v1beta1::{
            MsgFundCommunityPool, MsgSetWithdrawAddress, MsgWithdrawDelegatorReward,
        },
        gov::v1beta1::{MsgDeposit, MsgSubmitProposal, MsgVote},
        staking::v1beta1::{MsgBeginRedelegate, MsgDelegate, MsgUndelegate},
    },
    cosmwasm::wasm::v1::{MsgExecuteContract, MsgInstantiateContract},
};
use ibc_proto::ibc::applications::transfer::v1::MsgTransfer;
use prost::{DecodeError, Message};

use crate::{
    error::CodecError,
    message::IcaMessage,
    types::filetree::{
        MsgAddEditors, MsgAddViewers, MsgChangeOwner, MsgDeleteFile, MsgPostFile, MsgPostKey,
        MsgProvisionFileTree, MsgRemoveEditors, MsgRemoveViewers, MsgResetEditors,
        MsgResetViewers, MSG_ADD_EDITORS_TYPE_URL, MSG_ADD_VIEWERS_TYPE_URL,
        MSG_CHANGE_OWNER_TYPE_URL, MSG_DELETE_FILE_TYPE_URL, MSG_POST_FILE_TYPE_URL,
        MSG_POST_KEY_TYPE_URL, MSG_PROVISION_FILE_TREE_TYPE_URL, MSG_REMOVE_EDITORS_TYPE_URL,
        MSG_REMOVE_VIEWERS_TYPE_URL, MSG_RESET_EDITORS_TYPE_URL, MSG_RESET_VIEWERS_TYPE_URL,
    },
};

/// Type URLs of the built-in message types.
pub mod type_url {
    /// `cosmos.bank.v1beta1.MsgSend`
    pub const MSG_SEND: &str = "/cosmos.bank.v1beta1.MsgSend";
    /// `cosmos.staking.v1beta1.MsgDelegate`
    pub const MSG_DELEGATE: &str = "/cosmos.staking.v1beta1.MsgDelegate";
    /// `cosmos.staking.v1beta1.MsgUndelegate`
    pub const MSG_UNDELEGATE: &str = "/cosmos.staking.v1beta1.MsgUndelegate";
    /// `cosmos.staking.v1beta1.MsgBeginRedelegate`
    pub const MSG_BEGIN_REDELEGATE: &str = "/cosmos.staking.v1beta1.MsgBeginRedelegate";
    /// `cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward`
    pub const MSG_WITHDRAW_DELEGATOR_REWARD: &str =
        "/cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward";
    /// `cosmos.distribution.v1beta1.MsgSetWithdrawAddress`
    pub const MSG_SET_WITHDRAW_ADDRESS: &str = "/cosmos.distribution.v1beta1.MsgSetWithdrawAddress";
    /// `cosmos.distribution.v1beta1.MsgFundCommunityPool`
    pub const MSG_FUND_COMMUNITY_POOL: &str = "/cosmos.distribution.v1beta1.MsgFundCommunityPool";
    /// `cosmos.gov.v1beta1.MsgSubmitProposal`
    pub const MSG_SUBMIT_PROPOSAL: &str = "/cosmos.gov.v1beta1.MsgSubmitProposal";
    /// `cosmos.gov.v1beta1.MsgDeposit`
    pub const MSG_DEPOSIT: &str = "/cosmos.gov.v1beta1.MsgDeposit";
    /// `cosmos.gov.v1beta1.MsgVote`
    pub const MSG_VOTE: &str = "/cosmos.gov.v1beta1.MsgVote";
    /// `ibc.applications.transfer.v1.MsgTransfer`
    pub const MSG_TRANSFER: &str = "/ibc.applications.transfer.v1.MsgTransfer";
    /// `cosmwasm.wasm.v1.MsgExecuteContract`
    pub const MSG_EXECUTE_CONTRACT: &str = "/cosmwasm.wasm.v1.MsgExecuteContract";
    /// `cosmwasm.wasm.v1.MsgInstantiateContract`
    pub const MSG_INSTANTIATE_CONTRACT: &str = "/cosmwasm.wasm.v1.MsgInstantiateContract";
}

/// Checks that a payload decodes as one concrete message type.
pub type Validator = fn(&[u8]) -> Result<(), DecodeError>;

fn decodes_as<M: Message + Default>(value: &[u8]) -> Result<(), DecodeError> {
    M::decode(value).map(|_| ())
}

/// Maps type URLs to the validator of their concrete protobuf type.
///
/// [`TypeRegistry::default`] holds the built-in Cosmos SDK, IBC transfer,
/// `CosmWasm` and Jackal filetree messages; [`TypeRegistry::empty`] holds
/// nothing.
#[derive(Clone)]
pub struct TypeRegistry {
    validators: BTreeMap<String, Validator>,
}

impl TypeRegistry {
    /// A registry that resolves no type URL.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            validators: BTreeMap::new(),
        }
    }

    /// Registers `M` under `type_url`, replacing any previous entry.
    pub fn register<M: Message + Default>(&mut self, type_url: impl Into<String>) -> &mut Self {
        self.validators.insert(type_url.into(), decodes_as::<M>);
        self
    }

    /// Whether `type_url` resolves.
    #[must_use]
    pub fn contains(&self, type_url: &str) -> bool {
        self.validators.contains_key(type_url)
    }

    /// The registered type URLs, in lexicographic order.
    pub fn type_urls(&self) -> impl Iterator<Item = &str> {
        self.validators.keys().map(String::as_str)
    }

    /// Resolves the message's type URL and checks its payload.
    /// # Errors
    /// Returns [`CodecError::UnknownTypeUrl`] if the type URL is not registered
    /// and [`CodecError::InvalidMessage`] if the payload does not decode.
    pub fn validate(&self, msg: &IcaMessage) -> Result<(), CodecError> {
        let validator = self
            .validators
            .get(&msg.type_url)
            .ok_or_else(|| CodecError::UnknownTypeUrl(msg.type_url.clone()))?;

        validator(&msg.value).map_err(|source| CodecError::InvalidMessage {
            type_url: msg.type_url.clone(),
            source,
        })
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register::<MsgSend>(type_url::MSG_SEND)
            .register::<MsgDelegate>(type_url::MSG_DELEGATE)
            .register::<MsgUndelegate>(type_url::MSG_UNDELEGATE)
            .register::<MsgBeginRedelegate>(type_url::MSG_BEGIN_REDELEGATE)
            .register::<MsgWithdrawDelegatorReward>(type_url::MSG_WITHDRAW_DELEGATOR_REWARD)
            .register::<MsgSetWithdrawAddress>(type_url::MSG_SET_WITHDRAW_ADDRESS)
            .register::<MsgFundCommunityPool>(type_url::MSG_FUND_COMMUNITY_POOL)
            .register::<MsgSubmitProposal>(type_url::MSG_SUBMIT_PROPOSAL)
            .register::<MsgDeposit>(type_url::MSG_DEPOSIT)
            .register::<MsgVote>(type_url::MSG_VOTE)
            .register::<MsgTransfer>(type_url::MSG_TRANSFER)
            .register::<MsgExecuteContract>(type_url::MSG_EXECUTE_CONTRACT)
            .register::<MsgInstantiateContract>(type_url::MSG_INSTANTIATE_CONTRACT)
            .register::<MsgPostKey>(MSG_POST_KEY_TYPE_URL)
            .register::<MsgPostFile>(MSG_POST_FILE_TYPE_URL)
            .register::<MsgDeleteFile>(MSG_DELETE_FILE_TYPE_URL)
            .register::<MsgAddViewers>(MSG_ADD_VIEWERS_TYPE_URL)
            .register::<MsgRemoveViewers>(MSG_REMOVE_VIEWERS_TYPE_URL)
            .register::<MsgResetViewers>(MSG_RESET_VIEWERS_TYPE_URL)
            .register::<MsgAddEditors>(MSG_ADD_EDITORS_TYPE_URL)
            .register::<MsgRemoveEditors>(MSG_REMOVE_EDITORS_TYPE_URL)
            .register::<MsgResetEditors>(MSG_RESET_EDITORS_TYPE_URL)
            .register::<MsgProvisionFileTree>(MSG_PROVISION_FILE_TREE_TYPE_URL)
            .register::<MsgChangeOwner>(MSG_CHANGE_OWNER_TYPE_URL);
        registry
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.validators.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use cosmos_sdk_proto::cosmos::base::v1beta1::Coin;

    use super::*;

    fn msg_send() -> IcaMessage {
        IcaMessage::encode(
            type_url::MSG_SEND,
            &MsgSend {
                from_address: "cosmos1ica".to_string(),
                to_address: "cosmos1receiver".to_string(),
                amount: vec![Coin {
                    denom: "uatom".to_string(),
                    amount: "100".to_string(),
                }],
            },
        )
    }

    #[test]
    fn test_default_registry_resolves_builtins() {
        let registry = TypeRegistry::default();

        registry.validate(&msg_send()).unwrap();
        assert!(registry.contains(type_url::MSG_TRANSFER));
        assert!(registry.contains(MSG_POST_KEY_TYPE_URL));
        assert_eq!(24, registry.type_urls().count());
    }

    #[test]
    fn test_default_registry_resolves_filetree_permissions() {
        let registry = TypeRegistry::default();
        let msg = IcaMessage::encode(
            MSG_ADD_VIEWERS_TYPE_URL,
            &MsgAddViewers {
                creator: "jkl1ica".to_string(),
                viewer_ids: crate::types::filetree::hash_hex("jkl1viewer"),
                viewer_keys: "encrypted-key".to_string(),
                address: crate::types::filetree::merkle_path("s/home/notes.txt"),
                file_owner: crate::types::filetree::hash_hex("jkl1ica"),
            },
        );
        registry.validate(&msg).unwrap();

        for url in [
            MSG_REMOVE_VIEWERS_TYPE_URL,
            MSG_RESET_VIEWERS_TYPE_URL,
            MSG_ADD_EDITORS_TYPE_URL,
            MSG_REMOVE_EDITORS_TYPE_URL,
            MSG_RESET_EDITORS_TYPE_URL,
            MSG_PROVISION_FILE_TREE_TYPE_URL,
            MSG_CHANGE_OWNER_TYPE_URL,
        ] {
            assert!(registry.contains(url), "{url} is not registered");
        }
    }

    #[test]
    fn test_unknown_type_url_fails_closed() {
        let registry = TypeRegistry::default();
        let msg = IcaMessage::new("/osmosis.gamm.v1beta1.MsgSwapExactAmountIn", vec![1, 2, 3]);

        let err = registry.validate(&msg).unwrap_err();
        assert!(
            matches!(err, CodecError::UnknownTypeUrl(url) if url == "/osmosis.gamm.v1beta1.MsgSwapExactAmountIn")
        );
    }

    #[test]
    fn test_empty_registry_resolves_nothing() {
        let err = TypeRegistry::empty().validate(&msg_send()).unwrap_err();
        assert!(matches!(err, CodecError::UnknownTypeUrl(_)));
    }

    #[test]
    fn test_payload_must_decode_as_registered_type() {
        let registry = TypeRegistry::default();
        // field 1, wire type 2, length 10 but only 1 byte follows
        let msg = IcaMessage::new(type_url::MSG_SEND, vec![0x0a, 0x0a, 0x01]);

        let err = registry.validate(&msg).unwrap_err();
        assert!(matches!(err, CodecError::InvalidMessage { type_url: url, .. } if url == type_url::MSG_SEND));
    }

    #[test]
    fn test_register_custom_type() {
        let mut registry = TypeRegistry::empty();
        registry.register::<MsgPostKey>("/custom.MsgPostKey");

        let msg = IcaMessage::encode(
            "/custom.MsgPostKey",
            &MsgPostKey {
                creator: "jkl1ica".to_string(),
                key: "02abcd".to_string(),
            },
        );
        registry.validate(&msg).unwrap();
    }
}
