//! The encodings a host chain accepts for the `CosmosTx` body of a packet.

use std::{fmt, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Encoding of the `CosmosTx` carried in a packet.
///
/// The variant names on the wire are the ones used in the ICS-27 version
/// metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum TxEncoding {
    /// Protobuf binary encoding
    #[default]
    #[serde(rename = "proto3")]
    Protobuf,
    /// JSON encoding
    #[serde(rename = "proto3json")]
    Proto3Json,
}

impl TxEncoding {
    /// The metadata string of this encoding.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Protobuf => "proto3",
            Self::Proto3Json => "proto3json",
        }
    }
}

impl fmt::Display for TxEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxEncoding {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proto3" => Ok(Self::Protobuf),
            "proto3json" => Ok(Self::Proto3Json),
            other => Err(CodecError::UnsupportedEncoding(other.to_string())),
        }
    }
}
