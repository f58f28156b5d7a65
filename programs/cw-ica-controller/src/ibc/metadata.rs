//! ICS-27 channel version metadata.

use cosmwasm_std::IbcChannel;
use ica_packet::TxEncoding;
use serde::{Deserialize, Serialize};

use crate::ContractError;

/// The ICS-27 version
pub const ICA_VERSION: &str = "ics27-1";
/// The only transaction type hosts execute
pub const TX_TYPE_SDK_MULTI_MSG: &str = "sdk_multi_msg";
/// The port of the host module
pub const HOST_PORT_ID: &str = "icahost";

/// The JSON metadata carried in the channel version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcaMetadata {
    /// ICS-27 version, `ics27-1`
    pub version: String,
    /// The controller side connection
    pub controller_connection_id: String,
    /// The host side connection
    pub host_connection_id: String,
    /// The interchain account, filled in by the host
    #[serde(default)]
    pub address: String,
    /// Encoding of packet bodies
    pub encoding: TxEncoding,
    /// Transaction type, `sdk_multi_msg`
    pub tx_type: String,
}

impl IcaMetadata {
    /// The metadata proposed by the controller.
    #[must_use]
    pub fn new(
        controller_connection_id: String,
        host_connection_id: String,
        encoding: TxEncoding,
    ) -> Self {
        Self {
            version: ICA_VERSION.to_string(),
            controller_connection_id,
            host_connection_id,
            address: String::new(),
            encoding,
            tx_type: TX_TYPE_SDK_MULTI_MSG.to_string(),
        }
    }

    /// Parses a channel version.
    /// # Errors
    /// Returns an error if the version is not JSON metadata.
    pub fn from_version(version: &str) -> Result<Self, ContractError> {
        serde_json::from_str(version).map_err(ContractError::InvalidMetadata)
    }

    /// Serializes the metadata into a channel version.
    /// # Errors
    /// Returns an error if JSON serialization fails.
    pub fn to_version(&self) -> Result<String, ContractError> {
        serde_json::to_string(self).map_err(ContractError::InvalidMetadata)
    }

    /// Checks the proposed metadata against the channel being opened.
    /// # Errors
    /// Returns an error if the version, the transaction type or the
    /// controller connection is not the expected one.
    pub fn validate(&self, channel: &IbcChannel) -> Result<(), ContractError> {
        if self.version != ICA_VERSION {
            return Err(ContractError::UnsupportedVersion(self.version.clone()));
        }
        if self.tx_type != TX_TYPE_SDK_MULTI_MSG {
            return Err(ContractError::UnsupportedTxType(self.tx_type.clone()));
        }
        ensure_eq(
            "controller_connection_id",
            &channel.connection_id,
            &self.controller_connection_id,
        )
    }

    /// Checks the metadata returned by the host against our proposal.
    /// # Errors
    /// Returns an error if any negotiated field differs or the host did not
    /// return an account address.
    pub fn validate_counterparty(&self, counterparty: &Self) -> Result<(), ContractError> {
        ensure_eq("version", &self.version, &counterparty.version)?;
        ensure_eq("tx_type", &self.tx_type, &counterparty.tx_type)?;
        ensure_eq(
            "encoding",
            self.encoding.as_str(),
            counterparty.encoding.as_str(),
        )?;
        ensure_eq(
            "controller_connection_id",
            &self.controller_connection_id,
            &counterparty.controller_connection_id,
        )?;
        ensure_eq(
            "host_connection_id",
            &self.host_connection_id,
            &counterparty.host_connection_id,
        )?;

        if counterparty.address.is_empty() {
            return Err(ContractError::EmptyIcaAddress);
        }
        Ok(())
    }
}

fn ensure_eq(field: &'static str, expected: &str, actual: &str) -> Result<(), ContractError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ContractError::MetadataMismatch {
            field,
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}
