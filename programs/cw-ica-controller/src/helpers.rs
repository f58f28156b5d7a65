//! Typed wrappers for contracts that instantiate, call or query the
//! controller.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Addr, CosmosMsg, QuerierWrapper, StdResult, WasmMsg};

use crate::{
    msg::{ContractStateResponse, ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg},
    state::{CallbackCounter, ChannelState},
};

/// A deployed controller contract.
#[cw_serde]
pub struct IcaControllerContract(pub Addr);

/// An uploaded controller code, used to instantiate new controllers.
#[cw_serde]
pub struct IcaControllerCode(pub u64);

impl IcaControllerContract {
    /// Wraps the controller at `addr`.
    #[must_use]
    pub const fn new(addr: Addr) -> Self {
        Self(addr)
    }

    /// The address of the controller.
    #[must_use]
    pub fn addr(&self) -> Addr {
        self.0.clone()
    }

    /// A [`WasmMsg::Execute`] of `msg` on the controller, without funds.
    /// # Errors
    /// Returns an error if the message cannot be serialized.
    pub fn call(&self, msg: impl Into<ExecuteMsg>) -> StdResult<CosmosMsg> {
        let msg = to_json_binary(&msg.into())?;
        Ok(WasmMsg::Execute {
            contract_addr: self.addr().into(),
            msg,
            funds: vec![],
        }
        .into())
    }

    /// Queries the channel of the controller.
    /// # Errors
    /// Returns an error if the query fails.
    pub fn query_channel(&self, querier: QuerierWrapper) -> StdResult<ChannelState> {
        querier.query_wasm_smart(self.addr(), &QueryMsg::GetChannel {})
    }

    /// Queries the interchain account and configuration of the controller.
    /// # Errors
    /// Returns an error if the query fails.
    pub fn query_state(&self, querier: QuerierWrapper) -> StdResult<ContractStateResponse> {
        querier.query_wasm_smart(self.addr(), &QueryMsg::GetContractState {})
    }

    /// Queries the packet outcome counters of the controller.
    /// # Errors
    /// Returns an error if the query fails.
    pub fn query_callback_counter(&self, querier: QuerierWrapper) -> StdResult<CallbackCounter> {
        querier.query_wasm_smart(self.addr(), &QueryMsg::GetCallbackCounter {})
    }

    /// A [`WasmMsg::UpdateAdmin`] of the controller.
    pub fn update_admin(&self, admin: impl Into<String>) -> CosmosMsg {
        WasmMsg::UpdateAdmin {
            contract_addr: self.addr().into(),
            admin: admin.into(),
        }
        .into()
    }

    /// A [`WasmMsg::Migrate`] of the controller to `new_code_id`.
    /// # Errors
    /// Returns an error if the message cannot be serialized.
    pub fn migrate(&self, msg: impl Into<MigrateMsg>, new_code_id: u64) -> StdResult<CosmosMsg> {
        let msg = to_json_binary(&msg.into())?;
        Ok(WasmMsg::Migrate {
            contract_addr: self.addr().into(),
            new_code_id,
            msg,
        }
        .into())
    }
}

impl IcaControllerCode {
    /// Wraps the code `code_id`.
    #[must_use]
    pub const fn new(code_id: u64) -> Self {
        Self(code_id)
    }

    /// The code id.
    #[must_use]
    pub const fn code_id(&self) -> u64 {
        self.0
    }

    /// A [`WasmMsg::Instantiate`] of this code, without funds.
    /// # Errors
    /// Returns an error if the message cannot be serialized.
    pub fn instantiate(
        &self,
        msg: impl Into<InstantiateMsg>,
        label: impl Into<String>,
        admin: Option<impl Into<String>>,
    ) -> StdResult<CosmosMsg> {
        let msg = to_json_binary(&msg.into())?;
        Ok(WasmMsg::Instantiate {
            admin: admin.map(Into::into),
            code_id: self.code_id(),
            msg,
            funds: vec![],
            label: label.into(),
        }
        .into())
    }
}
