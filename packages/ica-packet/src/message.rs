//! The abstract message carried by an interchain account packet.

use ibc_proto::google::protobuf::Any;
use serde::{Deserialize, Serialize};

/// A type-URL tagged, protobuf encoded message to be executed by the
/// interchain account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcaMessage {
    /// The fully qualified protobuf type URL, e.g. `/cosmos.bank.v1beta1.MsgSend`
    pub type_url: String,
    /// The protobuf encoded message
    #[serde(with = "crate::serde::base64_bytes")]
    pub value: Vec<u8>,
}

impl IcaMessage {
    /// Creates a message from an already encoded payload.
    pub fn new(type_url: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            type_url: type_url.into(),
            value: value.into(),
        }
    }

    /// Encodes `msg` and tags it with `type_url`.
    pub fn encode<M: prost::Message>(type_url: impl Into<String>, msg: &M) -> Self {
        Self::new(type_url, msg.encode_to_vec())
    }
}

impl From<IcaMessage> for Any {
    fn from(msg: IcaMessage) -> Self {
        Self {
            type_url: msg.type_url,
            value: msg.value,
        }
    }
}

impl From<Any> for IcaMessage {
    fn from(any: Any) -> Self {
        Self {
            type_url: any.type_url,
            value: any.value,
        }
    }
}
