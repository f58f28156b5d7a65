//! The ICS-27 packet envelope and the `CosmosTx` body it carries.

use ibc_proto::{
    google::protobuf::Any,
    ibc::applications::interchain_accounts::v1::{CosmosTx, Type},
};
use prost::Message;
use serde::{Deserialize, Serialize};

use crate::{
    encoding::TxEncoding, ensure, error::CodecError, message::IcaMessage, registry::TypeRegistry,
};

/// Maximum memo length accepted by ICS-27 hosts, in bytes.
pub const MAX_MEMO_CHAR_LENGTH: usize = 256;

/// `TYPE_EXECUTE_TX`, the only packet type a controller sends.
const EXECUTE_TX: i32 = Type::ExecuteTx as i32;

/// `InterchainAccountPacketData`, in the JSON form ibc-go hosts unmarshal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcaPacketData {
    /// Packet type, always `TYPE_EXECUTE_TX`
    #[serde(rename = "type")]
    pub packet_type: i32,
    /// The encoded `CosmosTx`
    #[serde(with = "crate::serde::base64_bytes")]
    pub data: Vec<u8>,
    /// Free-form memo, possibly empty
    #[serde(default)]
    pub memo: String,
}

/// JSON form of `CosmosTx`.
#[derive(Serialize, Deserialize)]
struct JsonCosmosTx {
    messages: Vec<IcaMessage>,
}

impl IcaPacketData {
    /// Builds a packet from a batch of messages.
    ///
    /// Every message is resolved against `registry` before anything is
    /// encoded, so a single bad message rejects the whole batch.
    /// # Errors
    /// Returns an error if the batch is empty, a message does not resolve, or
    /// the memo is too long.
    pub fn from_messages(
        registry: &TypeRegistry,
        encoding: TxEncoding,
        messages: Vec<IcaMessage>,
        memo: Option<String>,
    ) -> Result<Self, CodecError> {
        ensure!(!messages.is_empty(), CodecError::EmptyMessages);
        messages
            .iter()
            .try_for_each(|msg| registry.validate(msg))?;

        let data = encode_cosmos_tx(encoding, messages)?;
        Self::from_raw(data, memo)
    }

    /// Wraps an already encoded `CosmosTx` body.
    /// # Errors
    /// Returns an error if `data` is empty or the memo is too long.
    pub fn from_raw(data: Vec<u8>, memo: Option<String>) -> Result<Self, CodecError> {
        ensure!(!data.is_empty(), CodecError::EmptyPacketData);

        let memo = memo.unwrap_or_default();
        let len = memo.len();
        ensure!(
            len <= MAX_MEMO_CHAR_LENGTH,
            CodecError::MemoTooLong {
                len,
                max: MAX_MEMO_CHAR_LENGTH,
            }
        );

        Ok(Self {
            packet_type: EXECUTE_TX,
            data,
            memo,
        })
    }

    /// The packet bytes sent over the channel.
    /// # Errors
    /// Returns an error if JSON serialization fails.
    pub fn to_vec(&self) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parses packet bytes.
    /// # Errors
    /// Returns an error if the bytes are not a JSON envelope or the packet
    /// type is not `TYPE_EXECUTE_TX`.
    pub fn from_slice(bz: &[u8]) -> Result<Self, CodecError> {
        let packet: Self = serde_json::from_slice(bz)?;
        ensure!(
            packet.packet_type == EXECUTE_TX,
            CodecError::InvalidPacketType(packet.packet_type)
        );
        Ok(packet)
    }

    /// Decodes the messages carried in the body.
    /// # Errors
    /// Returns an error if the body is not a `CosmosTx` in `encoding`.
    pub fn messages(&self, encoding: TxEncoding) -> Result<Vec<IcaMessage>, CodecError> {
        decode_cosmos_tx(encoding, &self.data)
    }
}

/// Encodes a `CosmosTx` body.
/// # Errors
/// Returns an error if JSON serialization fails.
pub fn encode_cosmos_tx(
    encoding: TxEncoding,
    messages: Vec<IcaMessage>,
) -> Result<Vec<u8>, CodecError> {
    match encoding {
        TxEncoding::Protobuf => Ok(CosmosTx {
            messages: messages.into_iter().map(Any::from).collect(),
        }
        .encode_to_vec()),
        TxEncoding::Proto3Json => Ok(serde_json::to_vec(&JsonCosmosTx { messages })?),
    }
}

/// Decodes a `CosmosTx` body.
/// # Errors
/// Returns an error if `bz` is not a `CosmosTx` in `encoding`.
pub fn decode_cosmos_tx(encoding: TxEncoding, bz: &[u8]) -> Result<Vec<IcaMessage>, CodecError> {
    match encoding {
        TxEncoding::Protobuf => Ok(CosmosTx::decode(bz)?
            .messages
            .into_iter()
            .map(IcaMessage::from)
            .collect()),
        TxEncoding::Proto3Json => Ok(serde_json::from_slice::<JsonCosmosTx>(bz)?.messages),
    }
}

#[cfg(test)]
mod tests {
    use cosmos_sdk_proto::cosmos::{
        base::v1beta1::Coin,
        gov::v1beta1::{MsgDeposit, MsgVote},
    };
    use rstest::rstest;

    use super::*;
    use crate::registry::type_url;

    fn batch() -> Vec<IcaMessage> {
        vec![
            IcaMessage::encode(
                type_url::MSG_VOTE,
                &MsgVote {
                    proposal_id: 1,
                    voter: "cosmos1ica".to_string(),
                    option: 1,
                },
            ),
            IcaMessage::encode(
                type_url::MSG_DEPOSIT,
                &MsgDeposit {
                    proposal_id: 1,
                    depositor: "cosmos1ica".to_string(),
                    amount: vec![Coin {
                        denom: "uatom".to_string(),
                        amount: "5000".to_string(),
                    }],
                },
            ),
        ]
    }

    #[rstest]
    #[case::protobuf(TxEncoding::Protobuf)]
    #[case::json(TxEncoding::Proto3Json)]
    fn test_decode_inverts_encode(#[case] encoding: TxEncoding) {
        let registry = TypeRegistry::default();
        let packet = IcaPacketData::from_messages(
            &registry,
            encoding,
            batch(),
            Some("deposit".to_string()),
        )
        .unwrap();

        let parsed = IcaPacketData::from_slice(&packet.to_vec().unwrap()).unwrap();
        assert_eq!(packet, parsed);
        assert_eq!("deposit", parsed.memo);
        assert_eq!(batch(), parsed.messages(encoding).unwrap());
    }

    #[test]
    fn test_protobuf_body_is_cosmos_tx() {
        let packet = IcaPacketData::from_messages(
            &TypeRegistry::default(),
            TxEncoding::Protobuf,
            batch(),
            None,
        )
        .unwrap();

        let tx = CosmosTx::decode(packet.data.as_slice()).unwrap();
        assert_eq!(2, tx.messages.len());
        assert_eq!(type_url::MSG_VOTE, tx.messages[0].type_url);
        assert_eq!(type_url::MSG_DEPOSIT, tx.messages[1].type_url);
        assert_eq!("", packet.memo);
    }

    #[test]
    fn test_json_wire_format() {
        let msg = IcaMessage::encode(
            type_url::MSG_VOTE,
            &MsgVote {
                proposal_id: 7,
                voter: "cosmos1ica".to_string(),
                option: 1,
            },
        );
        let packet = IcaPacketData::from_messages(
            &TypeRegistry::default(),
            TxEncoding::Proto3Json,
            vec![msg.clone()],
            Some("memo".to_string()),
        )
        .unwrap();

        let envelope: serde_json::Value = serde_json::from_slice(&packet.to_vec().unwrap()).unwrap();
        assert_eq!(1, envelope["type"]);
        assert_eq!("memo", envelope["memo"]);

        let body: serde_json::Value = serde_json::from_slice(&packet.data).unwrap();
        assert_eq!(type_url::MSG_VOTE, body["messages"][0]["type_url"]);
        let value = body["messages"][0]["value"].as_str().unwrap();
        assert_eq!(
            serde_json::to_value(&msg).unwrap()["value"].as_str().unwrap(),
            value
        );
    }

    #[test]
    fn test_one_bad_message_rejects_batch() {
        let mut messages = batch();
        messages.push(IcaMessage::new("/unknown.v1.MsgDoThing", vec![0x01]));

        let err = IcaPacketData::from_messages(
            &TypeRegistry::default(),
            TxEncoding::Protobuf,
            messages,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::UnknownTypeUrl(_)));
    }

    #[test]
    fn test_empty_batch() {
        let err = IcaPacketData::from_messages(
            &TypeRegistry::default(),
            TxEncoding::Protobuf,
            vec![],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::EmptyMessages));
    }

    #[rstest]
    #[case::at_limit(MAX_MEMO_CHAR_LENGTH, true)]
    #[case::over_limit(MAX_MEMO_CHAR_LENGTH + 1, false)]
    fn test_memo_length(#[case] len: usize, #[case] ok: bool) {
        let result = IcaPacketData::from_raw(vec![0x0a], Some("m".repeat(len)));
        assert_eq!(ok, result.is_ok());
    }

    #[rstest]
    #[case::two_byte_chars("\u{e9}".repeat(128), true)]
    #[case::two_byte_chars_over_limit("\u{e9}".repeat(200), false)]
    #[case::four_byte_chars_over_limit("\u{1f680}".repeat(65), false)]
    fn test_memo_length_counts_bytes(#[case] memo: String, #[case] ok: bool) {
        let len = memo.len();
        match IcaPacketData::from_raw(vec![0x0a], Some(memo)) {
            Ok(_) => assert!(ok),
            Err(err) => {
                assert!(!ok);
                assert!(matches!(
                    err,
                    CodecError::MemoTooLong { len: rejected, max: MAX_MEMO_CHAR_LENGTH } if rejected == len
                ));
            }
        }
    }

    #[test]
    fn test_raw_body_must_not_be_empty() {
        let err = IcaPacketData::from_raw(vec![], None).unwrap_err();
        assert!(matches!(err, CodecError::EmptyPacketData));
    }

    #[test]
    fn test_rejects_other_packet_types() {
        let err = IcaPacketData::from_slice(br#"{"type":0,"data":"CgA=","memo":""}"#).unwrap_err();
        assert!(matches!(err, CodecError::InvalidPacketType(0)));
    }
}
