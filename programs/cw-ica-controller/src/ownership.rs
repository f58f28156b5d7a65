//! Owner checks and the two step ownership transfer.

use cosmwasm_std::{ensure, Addr, DepsMut, MessageInfo, Response, Storage};

use crate::{
    msg::OwnershipAction,
    state::{Ownership, OWNERSHIP},
    ContractError,
};

impl Ownership {
    /// Ownership with no transfer in progress.
    #[must_use]
    pub const fn new(owner: Addr) -> Self {
        Self {
            owner,
            pending_owner: None,
        }
    }
}

/// Fails unless `sender` is the owner.
/// # Errors
/// Returns [`ContractError::Unauthorized`] if `sender` is not the owner.
pub fn assert_owner(storage: &dyn Storage, sender: &Addr) -> Result<(), ContractError> {
    let ownership = OWNERSHIP.load(storage)?;
    ensure!(&ownership.owner == sender, ContractError::Unauthorized);
    Ok(())
}

/// Executes one step of an ownership transfer.
/// # Errors
/// Returns an error if the caller may not perform the step.
pub fn update_ownership(
    deps: DepsMut,
    info: &MessageInfo,
    action: OwnershipAction,
) -> Result<Response, ContractError> {
    let mut ownership = OWNERSHIP.load(deps.storage)?;

    let response = match action {
        OwnershipAction::TransferOwnership { new_owner } => {
            ensure!(ownership.owner == info.sender, ContractError::Unauthorized);
            let new_owner = deps.api.addr_validate(&new_owner)?;
            let response = Response::new()
                .add_attribute("action", "transfer_ownership")
                .add_attribute("pending_owner", &new_owner);
            ownership.pending_owner = Some(new_owner);
            response
        }
        OwnershipAction::AcceptOwnership {} => {
            ensure!(
                ownership.pending_owner.as_ref() == Some(&info.sender),
                ContractError::NotPendingOwner
            );
            ownership = Ownership::new(info.sender.clone());
            Response::new()
                .add_attribute("action", "accept_ownership")
                .add_attribute("owner", &info.sender)
        }
    };

    OWNERSHIP.save(deps.storage, &ownership)?;
    Ok(response)
}
